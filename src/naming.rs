use crate::{
    config::CollisionPolicy,
    error::{Error, Result},
    file::SourceFile,
};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

const OUTPUT_EXTENSION: &str = "jpg";

/// Assigns output paths so that no two files of a run share one.
///
/// Names are compared case-insensitively, since `a.jpg` and `A.jpg` are the
/// same file on common filesystems. A name is reserved as soon as it is
/// handed out, whether or not the conversion later succeeds.
#[derive(Debug)]
pub(crate) struct OutputNamer {
    output_dir: PathBuf,
    policy: CollisionPolicy,
    /// Lowercased output file name -> source name that claimed it
    taken: HashMap<String, String>,
}

impl OutputNamer {
    pub(crate) fn new(output_dir: impl Into<PathBuf>, policy: CollisionPolicy) -> Self {
        Self {
            output_dir: output_dir.into(),
            policy,
            taken: HashMap::new(),
        }
    }

    /// Returns the output path for `file`.
    ///
    /// The first file with a given stem gets `<stem>.jpg`. Later ones get
    /// `<stem>_<ext>.jpg`, then `<stem>_<ext>_2.jpg` and so on, unless the
    /// policy is [`CollisionPolicy::Error`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NameCollision`] under [`CollisionPolicy::Error`] when
    /// `<stem>.jpg` is already taken.
    pub(crate) fn assign(&mut self, file: &SourceFile) -> Result<PathBuf> {
        let stem = file.stem();
        let preferred = format!("{stem}.{OUTPUT_EXTENSION}");

        let owner = self.taken.get(&preferred.to_lowercase()).cloned();
        let Some(owner) = owner else {
            return Ok(self.claim(preferred, &file.name));
        };

        if self.policy == CollisionPolicy::Error {
            return Err(Error::name_collision(self.output_dir.join(&preferred), owner));
        }

        let base = match file.extension() {
            Some(ext) => format!("{stem}_{ext}"),
            None => stem,
        };

        let mut candidate = format!("{base}.{OUTPUT_EXTENSION}");
        let mut counter = 2usize;
        while self.taken.contains_key(&candidate.to_lowercase()) {
            candidate = format!("{base}_{counter}.{OUTPUT_EXTENSION}");
            counter += 1;
        }

        debug!(
            "Output name {} is taken by {}, using {} for {}",
            preferred, owner, candidate, file.name
        );

        Ok(self.claim(candidate, &file.name))
    }

    fn claim(&mut self, file_name: String, owner: &str) -> PathBuf {
        let path = self.output_dir.join(&file_name);
        self.taken.insert(file_name.to_lowercase(), owner.to_string());
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namer(policy: CollisionPolicy) -> OutputNamer {
        OutputNamer::new("/out", policy)
    }

    #[test]
    fn test_plain_stem() {
        let mut namer = namer(CollisionPolicy::Disambiguate);
        let path = namer.assign(&SourceFile::new("/in/cat.png")).unwrap();

        assert_eq!(path, PathBuf::from("/out/cat.jpg"));
    }

    #[test]
    fn test_same_stem_gets_extension_suffix() {
        let mut namer = namer(CollisionPolicy::Disambiguate);

        let first = namer.assign(&SourceFile::new("/in/cat.gif")).unwrap();
        let second = namer.assign(&SourceFile::new("/in/cat.png")).unwrap();

        assert_eq!(first, PathBuf::from("/out/cat.jpg"));
        assert_eq!(second, PathBuf::from("/out/cat_png.jpg"));
    }

    #[test]
    fn test_counter_when_suffix_is_taken() {
        let mut namer = namer(CollisionPolicy::Disambiguate);

        namer.assign(&SourceFile::new("/in/cat.gif")).unwrap();
        namer.assign(&SourceFile::new("/in/cat_png.bmp")).unwrap();
        let third = namer.assign(&SourceFile::new("/in/cat.png")).unwrap();

        assert_eq!(third, PathBuf::from("/out/cat_png_2.jpg"));
    }

    #[test]
    fn test_collision_is_case_insensitive() {
        let mut namer = namer(CollisionPolicy::Disambiguate);

        namer.assign(&SourceFile::new("/in/Cat.png")).unwrap();
        let second = namer.assign(&SourceFile::new("/in/cat.tiff")).unwrap();

        assert_eq!(second, PathBuf::from("/out/cat_tiff.jpg"));
    }

    #[test]
    fn test_no_extension_collision() {
        let mut namer = namer(CollisionPolicy::Disambiguate);

        namer.assign(&SourceFile::new("/in/scan.png")).unwrap();
        let second = namer.assign(&SourceFile::new("/in/scan")).unwrap();

        assert_eq!(second, PathBuf::from("/out/scan_2.jpg"));
    }

    #[test]
    fn test_error_policy() {
        let mut namer = namer(CollisionPolicy::Error);

        namer.assign(&SourceFile::new("/in/cat.gif")).unwrap();
        let err = namer.assign(&SourceFile::new("/in/cat.png")).unwrap_err();

        assert!(err.is_collision());
        assert!(err.to_string().contains("cat.gif"));
    }

    #[test]
    fn test_naming_is_deterministic() {
        let files = ["/in/a.bmp", "/in/a.png", "/in/b.png"].map(SourceFile::new);

        let run = || {
            let mut namer = namer(CollisionPolicy::Disambiguate);
            files
                .iter()
                .map(|f| namer.assign(f).unwrap())
                .collect::<Vec<_>>()
        };

        assert_eq!(run(), run());
    }
}
