//! Le build script.

use std::env;
use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use std::str;


/// File in the $OUT_DIR where the current revision is written.
const REVISION_FILE: &str = "revision";


fn main() -> Result<(), Box<dyn Error>> {
    // The SHA goes into an ad-hoc file for include_str!(),
    // which is empty when the revision is unknown.
    let out_dir = env::var("OUT_DIR")?;
    let mut revision_file = File::create(Path::new(&out_dir).join(REVISION_FILE))?;
    match git_head_sha() {
        Ok(rev) => revision_file.write_all(rev.as_bytes())?,
        Err(e) => println!("cargo:warning=Failed to obtain current Git SHA: {}", e),
    }
    Ok(())
}

fn git_head_sha() -> Result<String, Box<dyn Error>> {
    let output = Command::new("git")
        .args(&["rev-parse", "--short", "HEAD"])
        .output()?;
    if !output.status.success() {
        return Err(format!("git exited with {}", output.status).into());
    }
    let sha = str::from_utf8(&output.stdout)?.trim().to_owned();
    Ok(sha)
}
