pub mod labels;
pub mod options;
pub mod pick;
