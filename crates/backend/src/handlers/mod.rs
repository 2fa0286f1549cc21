pub mod a001_member;
pub mod a002_membership_type;
pub mod d100_gym_overview;
