//! Custom extractors.

mod json_or_multipart;
mod params;
mod request_context;
mod validated_json;

pub use json_or_multipart::JsonOrMultipart;
pub use params::{Path, Query};
pub use request_context::{
    Admin, Authorized, CredentialState, Member, Policy, RequestContext, Staff,
};
pub use validated_json::ValidatedJson;
