//! lab-clone: clone GitLab projects by shorthand and link fork upstreams

use anyhow::Result;

fn main() -> Result<()> {
    lab_clone::cli::run()
}
