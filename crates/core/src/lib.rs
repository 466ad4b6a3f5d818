//! DLNA playback negotiation
//!
//! Given a probe report and a renderer's device profile, decide whether the
//! media must be transcoded, build the `contentFeatures.dlna.org` header and
//! the ordered directive lists for the external encoder.

pub mod decision;
pub mod error;
pub mod header;
pub mod mime;
pub mod models;
pub mod options;
pub mod profile;
pub mod protocol_info;
pub mod session;
pub mod traits;

pub use decision::*;
pub use error::*;
pub use header::*;
pub use mime::*;
pub use models::*;
pub use options::*;
pub use profile::*;
pub use protocol_info::*;
pub use session::*;
pub use traits::*;
