pub mod a001_member;
pub mod a002_membership_type;
pub mod a003_membership;
pub mod common;
