use crate::aerial_pipeline::common::error::Result;
use crate::aerial_pipeline::raster::types::RasterImage;

pub trait RasterReader {
    fn read_raster(&self, data: &[u8]) -> Result<RasterImage>;
}
