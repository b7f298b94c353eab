/// Upper bound accepted for `max_depth`. Training recurses once per level.
pub const MAX_DEPTH_LIMIT: usize = 1024;
/// Branch marker printed for the root node.
pub const ROOT_MARKER: &str = "root";
/// Indentation marker printed once per level of depth.
pub const DEPTH_MARKER: char = '|';
/// Field delimiter of the tabular input format.
pub const DELIMITER: u8 = b'\t';
