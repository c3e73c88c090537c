//! Classpath and source-directory aggregation.
//!
//! Both sets are built from [`ProjectConfig`] on every invocation. They are
//! duplicate-free and iterate in first-insertion order, following the union
//! order documented on each function, so the command line is reproducible.

use indexmap::IndexSet;

use crate::config::ProjectConfig;

/// Separator placed after every classpath entry.
#[cfg(windows)]
pub const PATH_SEPARATOR: char = ';';
#[cfg(not(windows))]
pub const PATH_SEPARATOR: char = ':';

/// Classpath entries for the runner JVM.
///
/// Union, in order, of: compile classpath, test classpath, source
/// directories, test source directories, the absolute default test-source
/// directory, and the absolute generated-source directory.
pub fn classpath_elements(project: &ProjectConfig) -> IndexSet<String> {
    let mut cp = IndexSet::new();
    cp.extend(project.compile_classpath.iter().cloned());
    cp.extend(project.test_classpath.iter().cloned());
    cp.extend(source_directories(project));
    cp
}

/// Directories the runner loads tests from.
///
/// Union, in order, of: source directories, test source directories, the
/// absolute default test-source directory, and the absolute generated-source
/// directory. Raw classpath entries are not included.
pub fn source_directories(project: &ProjectConfig) -> IndexSet<String> {
    let mut dirs = IndexSet::new();
    dirs.extend(project.source_dirs.iter().cloned());
    dirs.extend(project.test_source_dirs.iter().cloned());
    dirs.insert(absolute(project, &project.test_source_dir));
    dirs.insert(absolute(project, &project.generated_source_dir));
    dirs
}

/// Serializes classpath entries for `-cp`.
///
/// Every entry, including the last, is followed by [`PATH_SEPARATOR`].
pub fn join_classpath<'a, I>(elements: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    let mut joined = String::new();
    for element in elements {
        joined.push_str(element);
        joined.push(PATH_SEPARATOR);
    }
    joined
}

fn absolute(project: &ProjectConfig, path: &std::path::Path) -> String {
    project.resolve_path(path).to_string_lossy().into_owned()
}
