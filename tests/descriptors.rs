//! Descriptor accounting across repeated commands.
//!
//! Lives in its own test binary so no other test opens or closes
//! descriptors while the count is taken.

#![cfg(target_os = "linux")]

use std::fs;

use tempdir::TempDir;

use tsh::core::job::Job;
use tsh::execute_command::launch_job;

fn open_descriptors() -> usize {
    fs::read_dir("/proc/self/fd")
        .expect("unable to read /proc/self/fd")
        .count()
}

#[test]
fn test_no_descriptor_leak_between_commands() {
    let dir = TempDir::new("tsh_descriptors").unwrap();
    let input = dir.path().join("in.txt");
    let out = dir.path().join("out.txt");
    fs::write(&input, "b\na\n").unwrap();

    let before = open_descriptors();
    for _ in 0..5 {
        let mut job = Job::parse(&format!(
            "cat < {} | sort | wc -l > {}",
            input.display(),
            out.display()
        ))
        .unwrap();
        assert!(launch_job(&mut job, false).unwrap().success());
        drop(job);

        // Both lines open the input file before the pipeline is rejected.
        assert!(Job::parse(&format!("cat < {} | | wc", input.display())).is_err());
        assert!(
            Job::parse(&format!("cat < {} > {} |", input.display(), out.display())).is_err()
        );
    }

    assert_eq!(open_descriptors(), before);
    assert_eq!(fs::read_to_string(&out).unwrap().trim(), "2");
}
