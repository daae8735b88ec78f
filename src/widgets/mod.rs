//! Drawing helpers shared by zone baking and the per-frame overlay.
//!
//! - [`primitives`]: segmented progress bar and navigation arrows
//! - [`text`]: row-based centred text
//!
//! Every helper is generic over `DrawTarget<Color = Rgb565>`, so the same code
//! draws into an off-screen [`Surface`](crate::surface::Surface) when a zone is
//! baked and onto the live screen when an overlay is drawn. Draw errors are
//! ignored with `.ok()`: a dropped primitive only costs one frame.

mod primitives;
mod text;

pub use primitives::{BarLayout, draw_arrows, draw_progress_bar};
pub use text::{draw_row, row_anchor};
