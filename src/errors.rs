// Create the Error, ErrorKind, ResultExt, and Result types for the library.
// Other modules `use crate::errors::*;` to get access to everything
// `error_chain!` creates.
use error_chain::error_chain;

error_chain! {

    foreign_links {
        Io(::std::io::Error);
        Image(::image::ImageError);
    }

    errors {
        NoGrid {
            description("no maze grid")
            display("no maze has been generated yet, generate one before solving")
        }
        InvalidDimensions(rows: usize, columns: usize) {
            description("invalid grid dimensions")
            display("invalid grid dimensions {}x{}, rows and columns must be at least 1", rows, columns)
        }
        InvalidLoopFactor(factor: f64) {
            description("invalid loop factor")
            display("invalid loop factor {}, it must be a number from 0 to 1", factor)
        }
    }
}
