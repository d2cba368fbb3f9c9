use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::aerial_pipeline::raster::RasterImage;
use crate::aerial_pipeline::scene::types::{LoadOutcome, LoadTicket, SceneFrame};

#[derive(Debug, Clone)]
pub(crate) struct LoadedRaster {
    pub raster: Arc<RasterImage>,
    pub generation: u64,
}

/// Latest raster and frame, replaced wholesale and never edited in place.
///
/// Loads are last-request-wins: every `begin_load` bumps the generation and
/// only the holder of the newest ticket may commit.
#[derive(Debug, Default)]
pub(crate) struct LiveState {
    generation: AtomicU64,
    raster: RwLock<Option<LoadedRaster>>,
    frame: RwLock<Option<Arc<SceneFrame>>>,
}

impl LiveState {
    pub fn begin_load(&self) -> LoadTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Issued load generation {}", generation);
        LoadTicket { generation }
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    pub fn commit_raster(&self, ticket: LoadTicket, raster: RasterImage) -> LoadOutcome {
        let mut slot = self.raster.write().unwrap_or_else(PoisonError::into_inner);
        // checked under the lock so a newer commit cannot interleave
        if !self.is_current(ticket) {
            debug!("Discarding stale load generation {}", ticket.generation);
            return LoadOutcome::Superseded;
        }
        *slot = Some(LoadedRaster {
            raster: Arc::new(raster),
            generation: ticket.generation,
        });
        LoadOutcome::Applied
    }

    pub fn raster(&self) -> Option<LoadedRaster> {
        self.raster
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn frame(&self) -> Option<Arc<SceneFrame>> {
        self.frame
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swaps in `frame` unless its raster has been replaced meanwhile.
    pub fn publish(&self, frame: Arc<SceneFrame>) -> bool {
        let raster = self.raster.read().unwrap_or_else(PoisonError::into_inner);
        let current = raster.as_ref().map(|loaded| loaded.generation);
        if current != Some(frame.raster_generation) {
            return false;
        }
        *self.frame.write().unwrap_or_else(PoisonError::into_inner) = Some(frame);
        true
    }
}
