/// Maps a program token to the path handed to exec.
///
/// Absolute paths and `./`-relative paths are kept as is, other paths
/// containing a `/` are made relative to the working directory, and bare
/// names are looked up in `bin_dir` only. Nothing here touches the file
/// system; a missing program surfaces when exec fails.
pub fn resolve(program: &str, bin_dir: &str) -> String {
	if program.starts_with('/') || program.starts_with("./") {
		program.to_string()
	} else if program.contains('/') {
		format!("./{}", program)
	} else if bin_dir.ends_with('/') {
		format!("{}{}", bin_dir, program)
	} else {
		format!("{}/{}", bin_dir, program)
	}
}

#[cfg(test)]
mod tests {
	use super::resolve;

	const BIN: &str = "/usr/bin/";

	#[test]
	fn absolute_and_dot_paths_unchanged() {
		assert_eq!(resolve("/bin/ls", BIN), "/bin/ls");
		assert_eq!(resolve("./a.out", BIN), "./a.out");
	}

	#[test]
	fn relative_paths_get_dot_prefix() {
		assert_eq!(resolve("build/prog", BIN), "./build/prog");
		assert_eq!(resolve("../prog", BIN), "./../prog");
	}

	#[test]
	fn bare_names_use_bin_dir() {
		assert_eq!(resolve("ls", BIN), "/usr/bin/ls");
		assert_eq!(resolve("ls", "/opt/bin"), "/opt/bin/ls");
	}
}
