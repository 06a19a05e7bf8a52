//! Fixed-size rtnetlink body structures.

pub mod addr;
pub mod link;
