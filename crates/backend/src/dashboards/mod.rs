pub mod d100_gym_overview;
