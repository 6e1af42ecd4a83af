/*!
 * Document model for subtitle repair.
 *
 * - `model`: `Document`, `Cue` and `TimeCode`
 */

pub mod model;

pub use model::{Cue, Document, TimeCode, LINE_BREAK};
