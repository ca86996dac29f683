use std::fs;
use std::io;
use std::path::Path;

use nix::unistd::Pid;

/// Find processes whose `comm` equals `name` under a procfs mount.
///
/// Entries that vanish or cannot be read mid-scan are skipped; only a failure
/// to list `proc_root` itself is reported.
pub fn find_processes(proc_root: &Path, name: &str) -> io::Result<Vec<Pid>> {
    let mut found = Vec::new();
    for entry in fs::read_dir(proc_root)? {
        let Ok(entry) = entry else { continue };
        let Some(pid) = entry
            .file_name()
            .to_str()
            .and_then(|raw| raw.parse::<i32>().ok())
        else {
            continue;
        };
        let Ok(comm) = fs::read_to_string(entry.path().join("comm")) else {
            continue;
        };
        if comm.trim_end_matches('\n') == name {
            found.push(Pid::from_raw(pid));
        }
    }
    found.sort_by_key(|pid| pid.as_raw());
    Ok(found)
}
