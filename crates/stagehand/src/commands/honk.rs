//! Honk command implementation
//!
//! A trivial output self-test to verify that stagehand runs at all.

use anyhow::Result;

/// Execute the `honk` command
pub fn execute() -> Result<i32> {
    // Includes ^G for a beep.
    println!("Honk!\u{7}");
    Ok(0)
}
