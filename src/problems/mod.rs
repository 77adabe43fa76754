//! Problem-specific solver entry points built on the cordon scheduler.

pub mod glws;
pub mod lcs;
pub mod lis;
