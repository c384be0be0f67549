#[cfg(test)]
mod integration_tests {
    use crate::compare_engine::{CompareOptions, FolderComparator, PresenceBitmask};
    use crate::compare_paths;
    use crate::config::CompareConfig;
    use crate::diagnostics::DiagnosticLevel;
    use crate::session::{ComparisonStatus, FolderSession, IntakeError};
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn make_dir(root: &Path, name: &str, entries: &[&str]) -> String {
        let dir = root.join(name);
        fs::create_dir(&dir).unwrap();
        for entry in entries {
            if let Some(sub) = entry.strip_suffix('/') {
                fs::create_dir(dir.join(sub)).unwrap();
            } else {
                fs::write(dir.join(entry), entry.as_bytes()).unwrap();
            }
        }
        dir.to_string_lossy().into_owned()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_three_real_folders() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(temp_dir.path(), "A", &["x", "y", "z"]);
        let b = make_dir(temp_dir.path(), "B", &["y", "z", "w"]);
        let c = make_dir(temp_dir.path(), "C", &["z"]);

        let report = compare_paths(&[a.clone(), b.clone(), c.clone()], CompareOptions::default()).await;
        let result = report.result;

        assert!(report.diagnostics.is_empty());
        assert_eq!(result.valid_directories, vec![a, b, c]);
        assert_eq!(result.common_files, strings(&["z"]));

        let ordered: Vec<(String, Vec<String>)> = result
            .ordered_pattern_groups()
            .into_iter()
            .map(|(mask, files)| (mask.to_string(), files.to_vec()))
            .collect();
        assert_eq!(
            ordered,
            vec![
                ("110".to_string(), strings(&["y"])),
                ("100".to_string(), strings(&["x"])),
                ("010".to_string(), strings(&["w"])),
            ]
        );
    }

    #[tokio::test]
    async fn test_subdirectories_count_but_are_not_descended() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(temp_dir.path(), "a", &["raw/", "cover.jpg"]);
        let b = make_dir(temp_dir.path(), "b", &["raw/"]);
        fs::write(Path::new(&a).join("raw").join("deep.cr2"), b"x").unwrap();

        let report = compare_paths(&[a, b], CompareOptions::default()).await;

        assert_eq!(report.result.common_files, strings(&["raw"]));
        assert_eq!(report.result.total_files(), 2);
    }

    #[tokio::test]
    async fn test_exclusion_tolerance_on_disk() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(temp_dir.path(), "a", &["1.txt", "2.txt"]);
        let b = make_dir(temp_dir.path(), "b", &["1.txt", "2.txt"]);
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, b"not a folder").unwrap();
        let missing = temp_dir.path().join("missing").to_string_lossy().into_owned();
        let file = file.to_string_lossy().into_owned();

        let clean = compare_paths(&[a.clone(), b.clone()], CompareOptions::default()).await;
        let noisy = compare_paths(
            &[missing.clone(), a.clone(), file.clone(), b.clone()],
            CompareOptions::default(),
        )
        .await;

        assert_eq!(clean.result, noisy.result);
        assert_eq!(noisy.result.common_files, strings(&["1.txt", "2.txt"]));
        assert!(noisy.result.pattern_groups.is_empty());

        let messages: Vec<_> = noisy.diagnostics.iter().map(|d| d.message.clone()).collect();
        assert_eq!(
            messages,
            vec![
                format!("directory not found: {missing}"),
                format!("not a directory: {file}"),
            ]
        );
        assert!(noisy.diagnostics.iter().all(|d| d.level == DiagnosticLevel::Warning));
    }

    #[tokio::test]
    async fn test_path_below_a_file_counts_as_missing() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(temp_dir.path(), "a", &["x"]);
        let b = make_dir(temp_dir.path(), "b", &["x"]);
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, b"not a folder").unwrap();
        let below = file.join("child").to_string_lossy().into_owned();

        let report = compare_paths(&[a.clone(), below.clone(), b.clone()], CompareOptions::default()).await;

        assert_eq!(report.result.valid_directories, vec![a.clone(), b]);
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].code, "ERR_DIRECTORY_NOT_FOUND");
        assert_eq!(report.diagnostics[0].message, format!("directory not found: {below}"));

        let mut session = FolderSession::new();
        session.add_folder(&a).unwrap();
        assert_eq!(session.add_folder(&below), Err(IntakeError::NotFound(below.clone())));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_quoted_input_is_sanitized() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(temp_dir.path(), "a", &["same"]);
        let b = make_dir(temp_dir.path(), "b", &["same"]);

        let quoted = vec![format!("  \"{a}/.\" "), format!("'{b}/../b'")];
        let report = compare_paths(&quoted, CompareOptions::default()).await;

        assert_eq!(report.result.valid_directories, vec![a, b]);
        assert_eq!(report.result.common_files, strings(&["same"]));
    }

    #[tokio::test]
    async fn test_degenerate_inputs() {
        let temp_dir = TempDir::new().unwrap();
        let only = make_dir(temp_dir.path(), "only", &["a"]);

        let empty = compare_paths(&[], CompareOptions::default()).await;
        assert!(empty.result.common_files.is_empty());
        assert!(empty.result.pattern_groups.is_empty());
        assert!(empty.result.valid_directories.is_empty());
        assert!(empty.diagnostics.is_empty());

        let single = compare_paths(&[only.clone()], CompareOptions::default()).await;
        assert!(single.result.common_files.is_empty());
        assert!(single.result.pattern_groups.is_empty());
        assert_eq!(single.result.valid_directories, vec![only]);
    }

    #[tokio::test]
    async fn test_repeated_comparison_is_identical() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(temp_dir.path(), "a", &["k", "l", "m", "n"]);
        let b = make_dir(temp_dir.path(), "b", &["l", "n", "o"]);
        let c = make_dir(temp_dir.path(), "c", &["m", "n", "p"]);
        let paths = vec![a, b, c];
        let comparator = FolderComparator::new(CompareOptions::default());

        let first = comparator.compare(&paths).await;
        let second = comparator.compare(&paths).await;

        assert_eq!(first.result, second.result);
        assert_eq!(
            serde_json::to_string(&first.result).unwrap(),
            serde_json::to_string(&second.result).unwrap()
        );
    }

    #[tokio::test]
    async fn test_partition_over_many_folders() {
        let temp_dir = TempDir::new().unwrap();
        let names = ["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7"];
        let mut paths = Vec::new();
        let mut contents = Vec::new();
        for folder in 0..5 {
            let entries: Vec<&str> = names
                .iter()
                .enumerate()
                .filter(|(i, _)| (i + 1) % (folder + 1) == 0 || *i == 7)
                .map(|(_, n)| *n)
                .collect();
            paths.push(make_dir(temp_dir.path(), &format!("f{folder}"), &entries));
            contents.push(entries.into_iter().map(String::from).collect::<BTreeSet<_>>());
        }

        let result = compare_paths(&paths, CompareOptions::default()).await.result;

        let mut seen = BTreeSet::new();
        for name in result.common_files.iter() {
            assert!(seen.insert(name.clone()));
            assert!(contents.iter().all(|c| c.contains(name)));
        }
        for (mask, files) in &result.pattern_groups {
            assert_ne!(*mask, PresenceBitmask::all_true(paths.len()));
            for name in files {
                assert!(seen.insert(name.clone()));
                for (index, set) in contents.iter().enumerate() {
                    assert_eq!(mask.get(index), set.contains(name));
                }
            }
        }
        let union: BTreeSet<String> = contents.iter().flatten().cloned().collect();
        assert_eq!(seen, union);
        assert_eq!(result.common_files, strings(&["n7"]));
    }

    #[tokio::test]
    async fn test_session_from_config() {
        let temp_dir = TempDir::new().unwrap();
        let a = make_dir(temp_dir.path(), "a", &["one", "two"]);
        let b = make_dir(temp_dir.path(), "b", &["two"]);
        let yaml = format!("folders:\n  - \"{a}\"\n  - \"{b}\"\nmax_parallel_listings: 2\n");
        let config = CompareConfig::from_yaml_str(&yaml).unwrap();

        let mut session = FolderSession::with_comparator(
            FolderComparator::new(config.compare_options()),
            config.max_log_lines,
        );
        for folder in &config.folders {
            session.add_folder(folder).unwrap();
        }

        let outcome = session.refresh().await;
        assert_eq!(outcome.status, ComparisonStatus::Compared);
        assert_eq!(outcome.report.result.common_files, strings(&["two"]));

        fs::remove_dir_all(&b).unwrap();
        let outcome = session.refresh().await;
        assert_eq!(outcome.pruned, vec![b]);
        assert_eq!(outcome.status, ComparisonStatus::NeedMoreFolders { valid: 1 });
        assert_eq!(session.folders(), &[a]);
        assert_eq!(session.log().len(), 1);
    }
}
