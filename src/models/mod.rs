pub mod frame;
pub mod plane;
pub mod profile;
pub mod region;
pub mod result;

pub use frame::{FrameView, OwnedFrame};
pub use plane::{EdgeMap, Plane};
pub use profile::{PeakCandidate, RowProfile, ScoredCandidate};
pub use region::{BoundingRegion, WorkingRegion};
pub use result::{Diagnostics, Reason, RefinementResult};
