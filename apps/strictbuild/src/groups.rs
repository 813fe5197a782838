//! Partitioning of job-definition files into process groups.

use crate::models::JobGroup;
use std::path::PathBuf;

/// Split `files` into consecutive groups of at most `group_size` files.
///
/// Order is preserved and every file lands in exactly one group. A
/// `group_size` of zero yields no groups.
pub fn partition(files: &[PathBuf], group_size: usize) -> Vec<JobGroup> {
    if group_size == 0 {
        return Vec::new();
    }
    files
        .chunks(group_size)
        .enumerate()
        .map(|(index, chunk)| JobGroup {
            index,
            files: chunk.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(n: usize) -> Vec<PathBuf> {
        (0..n).map(|i| PathBuf::from(format!("/cfg/{i}.json"))).collect()
    }

    #[test]
    fn test_partition_covers_all_files_in_order() {
        for f in 0..=17usize {
            for p in 1..=6usize {
                let input = files(f);
                let size = f.div_ceil(p);
                let groups = partition(&input, size);
                let expected_groups = if size == 0 { 0 } else { f.div_ceil(size) };
                assert_eq!(groups.len(), expected_groups, "f={f} p={p}");
                assert!(groups.len() <= p);
                assert!(groups.iter().all(|g| !g.files.is_empty() && g.files.len() <= size));
                let rebuilt: Vec<PathBuf> =
                    groups.iter().flat_map(|g| g.files.iter().cloned()).collect();
                assert_eq!(rebuilt, input);
            }
        }
    }

    #[test]
    fn test_last_group_may_be_smaller() {
        let groups = partition(&files(5), 2);
        let sizes: Vec<usize> = groups.iter().map(|g| g.files.len()).collect();
        assert_eq!(sizes, vec![2, 2, 1]);
        assert_eq!(groups[2].index, 2);
    }

    #[test]
    fn test_zero_group_size_yields_nothing() {
        assert!(partition(&[], 0).is_empty());
    }
}
