pub mod member_status;
