use hashwalk_scan::{
    EntryKind, ErrorKind, FileProcessor, HashAlgorithm, ProcessError, ProcessorConfig,
    compute_hash, hash_bytes, list_files, process_files,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn create_example_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.txt"), "hi").unwrap();
    fs::create_dir(temp.path().join("sub")).unwrap();
    temp
}

#[test]
fn test_example_tree_yields_one_record() {
    let temp = create_example_tree();
    let config = ProcessorConfig::new(temp.path());

    let report = FileProcessor::new(config).run().unwrap();

    assert_eq!(report.records.len(), 1);
    let record = &report.records[0];
    assert_eq!(record.path, temp.path().join("a.txt"));
    assert_eq!(record.kind, Some(EntryKind::File));
    assert_eq!(record.size, Some(2));
    assert!(record.modified.is_some());
    assert_eq!(
        record.content_hash,
        Some(hash_bytes(b"hi", HashAlgorithm::Sha256))
    );
    assert!(report.is_clean());
}

#[test]
fn test_readable_files_have_all_fields() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("x/y")).unwrap();
    fs::write(temp.path().join("one.bin"), vec![1u8; 4096]).unwrap();
    fs::write(temp.path().join("x/two.txt"), "two").unwrap();
    fs::write(temp.path().join("x/y/empty"), "").unwrap();

    let report = FileProcessor::new(ProcessorConfig::new(temp.path()))
        .run()
        .unwrap();

    assert_eq!(report.stats.files, 3);
    assert_eq!(report.stats.hashed, 3);
    assert_eq!(report.stats.total_size, 4096 + 3);
    for record in &report.records {
        assert!(record.size.is_some(), "{}", record.path.display());
        assert!(record.modified.is_some());
        assert!(record.content_hash.is_some());
        assert!(!record.is_degraded());
    }
}

#[test]
fn test_deleted_between_listing_and_processing() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("keep1.txt"), "keep").unwrap();
    fs::write(temp.path().join("vanish.txt"), "bye").unwrap();
    fs::write(temp.path().join("keep2.txt"), "keep too").unwrap();

    let paths: Vec<PathBuf> = list_files(temp.path(), false).unwrap().collect();
    assert_eq!(paths.len(), 3);

    fs::remove_file(temp.path().join("vanish.txt")).unwrap();

    let records = process_files(paths, &ProcessorConfig::new(temp.path()));

    assert_eq!(records.len(), 3);
    let vanished = records
        .iter()
        .find(|r| r.path.ends_with("vanish.txt"))
        .unwrap();
    assert!(vanished.is_degraded());
    assert_eq!(vanished.issue.as_ref().unwrap().kind, ErrorKind::NotFound);
    assert!(vanished.size.is_none());
    assert!(vanished.content_hash.is_none());

    let kept: Vec<_> = records.iter().filter(|r| !r.is_degraded()).collect();
    assert_eq!(kept.len(), 2);
    assert!(kept.iter().all(|r| r.content_hash.is_some()));
}

#[test]
fn test_directories_have_no_hash_or_size() {
    let temp = create_example_tree();
    let config = ProcessorConfig::builder()
        .root(temp.path())
        .include_dirs(true)
        .build()
        .unwrap();

    let report = FileProcessor::new(config).run().unwrap();

    assert_eq!(report.records.len(), 2);
    let dir = report.records.iter().find(|r| r.is_dir()).unwrap();
    assert_eq!(dir.path, temp.path().join("sub"));
    assert!(dir.content_hash.is_none());
    assert!(dir.size.is_none());
    assert!(dir.modified.is_some());
    assert!(!dir.is_degraded());
    assert_eq!(report.stats.dirs, 1);
}

#[test]
fn test_file_replaced_by_directory() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("shape");
    fs::write(&path, "file for now").unwrap();

    let paths: Vec<PathBuf> = list_files(temp.path(), false).unwrap().collect();
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();

    let records = process_files(paths, &ProcessorConfig::new(temp.path()));

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, Some(EntryKind::Directory));
    assert!(records[0].content_hash.is_none());
}

#[test]
fn test_hash_is_deterministic() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("first.txt");
    let second = temp.path().join("second.txt");
    fs::write(&first, "same content").unwrap();
    fs::write(&second, "same content").unwrap();

    for algorithm in [HashAlgorithm::Md5, HashAlgorithm::Sha256, HashAlgorithm::Blake3] {
        let a = compute_hash(&first, algorithm).unwrap().unwrap();
        let again = compute_hash(&first, algorithm).unwrap().unwrap();
        let b = compute_hash(&second, algorithm).unwrap().unwrap();
        assert_eq!(a, again);
        assert_eq!(a, b);
    }
}

#[test]
fn test_digest_lengths() {
    let temp = create_example_tree();
    let path = temp.path().join("a.txt");

    let legacy = compute_hash(&path, HashAlgorithm::Md5).unwrap().unwrap();
    let default = compute_hash(&path, HashAlgorithm::default()).unwrap().unwrap();

    assert_eq!(legacy.to_hex().len(), 32);
    assert_eq!(default.to_hex().len(), 64);
    assert_eq!(legacy.algorithm, HashAlgorithm::Md5);
}

#[test]
fn test_parallel_matches_sequential() {
    let temp = TempDir::new().unwrap();
    for i in 0..40 {
        let dir = temp.path().join(format!("d{}", i % 4));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("f{i}.txt")), format!("content {i}")).unwrap();
    }

    let sequential = FileProcessor::new(ProcessorConfig::new(temp.path()))
        .run()
        .unwrap();
    let parallel_config = ProcessorConfig::builder()
        .root(temp.path())
        .parallel(true)
        .build()
        .unwrap();
    let parallel = FileProcessor::new(parallel_config).run().unwrap();

    assert_eq!(sequential.records, parallel.records);
    assert_eq!(sequential.stats, parallel.stats);
}

#[test]
fn test_missing_root_is_fatal() {
    let temp = TempDir::new().unwrap();
    let config = ProcessorConfig::new(temp.path().join("does-not-exist"));

    let err = FileProcessor::new(config).run().unwrap_err();
    assert!(matches!(err, ProcessError::NotFound { .. }));
}

#[test]
fn test_progress_final_snapshot() {
    let temp = create_example_tree();
    let processor = FileProcessor::new(ProcessorConfig::new(temp.path()));
    let mut progress_rx = processor.subscribe();

    processor.run().unwrap();

    let progress = progress_rx.try_recv().unwrap();
    assert_eq!(progress.entries_processed, 1);
    assert_eq!(progress.bytes_hashed, 2);
    assert_eq!(progress.degraded, 0);
}

#[cfg(unix)]
#[test]
fn test_permission_denied_is_isolated() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let locked = temp.path().join("locked.txt");
    fs::write(&locked, "secret").unwrap();
    fs::write(temp.path().join("open.txt"), "public").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read anything; nothing to test then.
    if fs::File::open(&locked).is_ok() {
        return;
    }

    let report = FileProcessor::new(ProcessorConfig::new(temp.path()))
        .run()
        .unwrap();

    assert_eq!(report.records.len(), 2);
    let locked_record = report
        .records
        .iter()
        .find(|r| r.path.ends_with("locked.txt"))
        .unwrap();
    assert_eq!(
        locked_record.issue.as_ref().unwrap().kind,
        ErrorKind::PermissionDenied
    );
    // Stat still worked, so size survives in the degraded record
    assert_eq!(locked_record.size, Some(6));
    assert!(locked_record.content_hash.is_none());

    let err = compute_hash(&locked, HashAlgorithm::Sha256).unwrap_err();
    assert!(matches!(err, ProcessError::PermissionDenied { .. }));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subdirectory_becomes_degraded_record() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let locked = temp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("secret.txt"), "secret").unwrap();
    fs::create_dir(temp.path().join("ok")).unwrap();
    fs::write(temp.path().join("ok/a.txt"), "a").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read anything; nothing to test then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let report = FileProcessor::new(ProcessorConfig::new(temp.path()))
        .run()
        .unwrap();

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(report.stats.degraded, 1);
    assert!(!report.is_clean());
    let degraded: Vec<_> = report.degraded().collect();
    assert_eq!(degraded[0].path, locked);
    assert_eq!(
        degraded[0].issue.as_ref().unwrap().kind,
        ErrorKind::PermissionDenied
    );
    assert!(
        report
            .records
            .iter()
            .any(|r| r.path.ends_with("ok/a.txt") && r.content_hash.is_some())
    );
}

#[cfg(unix)]
#[test]
fn test_symlink_recorded_without_following() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("target.txt");
    let link = temp.path().join("link.txt");
    fs::write(&target, "pointed at").unwrap();
    std::os::unix::fs::symlink(&target, &link).unwrap();

    let records = process_files(vec![link.clone()], &ProcessorConfig::new(temp.path()));
    assert_eq!(records[0].kind, Some(EntryKind::Symlink));
    assert!(records[0].content_hash.is_none());
    assert!(records[0].size.is_none());
    assert!(!records[0].is_degraded());

    let following = ProcessorConfig::builder()
        .root(temp.path())
        .follow_symlinks(true)
        .build()
        .unwrap();
    let records = process_files(vec![link], &following);
    assert_eq!(records[0].kind, Some(EntryKind::File));
    assert_eq!(
        records[0].content_hash,
        Some(hash_bytes(b"pointed at", HashAlgorithm::Sha256))
    );
}
