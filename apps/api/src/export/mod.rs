pub mod capture;
pub mod print;

pub use capture::{CaptureError, HttpPdfCapture, PdfCapture};
pub use print::{wrap_for_print, PrintOptions};
