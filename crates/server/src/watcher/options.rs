use std::collections::HashSet;

use cliptrail_base::ClipFilter;
use snafu::Snafu;

// SAFETY: user may use bool to enable/disable the functions
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    pub load_current: bool,

    pub capture_image: bool,

    pub capture_file_list: bool,

    pub filter_text_min_length: usize,

    pub filter_text_max_length: usize,

    pub filter_image_max_size: usize,

    pub denied_text_regex_patterns: HashSet<String>,
}

impl Options {
    /// # Errors
    pub fn generate_clip_filter(&self) -> Result<ClipFilter, Error> {
        let mut filter = ClipFilter::new();
        filter.set_text_min_length(self.filter_text_min_length);
        filter.set_text_max_length(self.filter_text_max_length);
        filter.set_image_max_size(self.filter_image_max_size);
        filter.deny_image(!self.capture_image);
        filter.deny_file_list(!self.capture_file_list);
        filter.set_regex_patterns(regex::RegexSet::new(&self.denied_text_regex_patterns)?);
        Ok(filter)
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            load_current: true,
            capture_image: true,
            capture_file_list: true,
            filter_text_min_length: 1,
            // 5 MiB
            filter_text_max_length: 5 * (1 << 20),
            // 5 MiB
            filter_image_max_size: 5 * (1 << 20),
            denied_text_regex_patterns: HashSet::new(),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Failed to parse regular expression, error: {error}"))]
    ParseRegularExpressions { error: regex::Error },
}

impl From<regex::Error> for Error {
    fn from(error: regex::Error) -> Self { Self::ParseRegularExpressions { error } }
}
