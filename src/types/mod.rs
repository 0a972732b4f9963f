//! Shared response shapes.

mod response;

pub use response::{
    Created, CredentialEnvelope, MembershipResponse, MessageResponse, UserEnvelope,
};
