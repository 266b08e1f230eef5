pub const INSERT_MANY: usize = 100_000;
pub const GET_MANY: usize = 10_000;
pub const READER_THREADS: usize = 8;
