use crate::FileStatus;

/// Message used when the user leaves the commit message blank
pub fn generate_commit_message(status: &[FileStatus]) -> String {
    match status {
        [] => "Empty commit".to_string(),
        [file] => format!("Update file {}", basename(&file.path)),
        files => {
            let paths = files
                .iter()
                .map(|file| format!("- {}", file.path))
                .collect::<Vec<_>>()
                .join("\n");
            format!("Update {} files\n\n{paths}", files.len())
        }
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
