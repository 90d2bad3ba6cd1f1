//! Role selection and dispatch.

mod dispatcher;

pub use dispatcher::{RoleAssignment, RoleDispatcher, RoleGrant};
