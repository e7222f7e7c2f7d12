//! # walnut-pair CLI
//!
//! Command-line interface for walnut measurement and pairing.
//!
//! ## Usage
//! ```bash
//! walnut-pair measure walnuts/W001 --debug
//! walnut-pair compare walnuts/ --output json
//! ```

mod cli;

use walnut_pair::Result;

fn main() -> Result<()> {
    walnut_pair::init_tracing();
    cli::run()
}
