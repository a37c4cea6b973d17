//! Best-effort snapshot renderers.

use tracing::info;

use crate::field::FieldSnapshot;

use super::Renderer;

/// Logs a one-line summary of every published snapshot. Stands in for a real
/// visualization front end.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogRenderer;

impl Renderer for LogRenderer {
    fn publish(&self, snapshot: &FieldSnapshot) -> anyhow::Result<()> {
        info!(
            active_patches = snapshot.active_patches(),
            total_intensity = snapshot.total_intensity(),
            "field snapshot"
        );
        Ok(())
    }
}

/// Discards every snapshot. Useful when a run needs no rendering at all.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn publish(&self, _snapshot: &FieldSnapshot) -> anyhow::Result<()> {
        Ok(())
    }
}
