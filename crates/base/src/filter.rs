use std::fmt;

use crate::ClipContent;

/// Capture filter applied to classified content before it reaches the
/// history.
#[derive(Clone, Debug)]
pub struct Filter {
    regex_set: regex::RegexSet,
    deny_image: bool,
    deny_file_list: bool,
    filter_text_min_length: usize,
    filter_text_max_length: usize,
    filter_image_max_size: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rejection {
    TextTooShort,
    TextTooLong,
    DeniedPattern,
    ImageDenied,
    ImageTooLarge,
    FileListDenied,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TextTooShort => "text is shorter than the minimum length",
            Self::TextTooLong => "text is longer than the maximum length",
            Self::DeniedPattern => "text matches a denied pattern",
            Self::ImageDenied => "capturing images is disabled",
            Self::ImageTooLarge => "image is larger than the maximum size",
            Self::FileListDenied => "capturing file lists is disabled",
        })
    }
}

impl Filter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            regex_set: regex::RegexSet::empty(),

            deny_image: false,

            deny_file_list: false,

            filter_text_min_length: 1,

            // 5 MiB
            filter_text_max_length: 5 * (1 << 20),

            // 5 MiB
            filter_image_max_size: 5 * (1 << 20),
        }
    }

    pub fn set_regex_patterns(&mut self, regex_patterns: regex::RegexSet) {
        self.regex_set = regex_patterns;
    }

    pub fn set_text_min_length(&mut self, size: usize) { self.filter_text_min_length = size; }

    pub fn set_text_max_length(&mut self, size: usize) { self.filter_text_max_length = size; }

    pub fn set_image_max_size(&mut self, size: usize) { self.filter_image_max_size = size; }

    pub fn deny_image(&mut self, deny_image: bool) { self.deny_image = deny_image; }

    pub fn deny_file_list(&mut self, deny_file_list: bool) { self.deny_file_list = deny_file_list; }

    /// Returns the reason the content must not be captured, if any.
    #[must_use]
    pub fn filter_clip_content(&self, content: &ClipContent) -> Option<Rejection> {
        match content {
            ClipContent::Text(text) => self
                .filter_by_text_size(text)
                .or_else(|| self.filter_text_by_regular_expression(text)),
            ClipContent::Image(bytes) => {
                if self.deny_image {
                    Some(Rejection::ImageDenied)
                } else {
                    self.filter_by_image_size(bytes)
                }
            }
            ClipContent::FileList(_) => self.deny_file_list.then_some(Rejection::FileListDenied),
        }
    }

    #[inline]
    #[must_use]
    pub fn filter_by_text_size<S>(&self, text: S) -> Option<Rejection>
    where
        S: AsRef<str>,
    {
        let count = text.as_ref().chars().count();
        if count < self.filter_text_min_length {
            Some(Rejection::TextTooShort)
        } else if count > self.filter_text_max_length {
            Some(Rejection::TextTooLong)
        } else {
            None
        }
    }

    #[inline]
    pub fn filter_text_by_regular_expression<S>(&self, text: S) -> Option<Rejection>
    where
        S: AsRef<str>,
    {
        (!self.regex_set.is_empty() && self.regex_set.is_match(text.as_ref()))
            .then_some(Rejection::DeniedPattern)
    }

    #[inline]
    #[must_use]
    pub fn filter_by_image_size<D>(&self, data: D) -> Option<Rejection>
    where
        D: AsRef<[u8]>,
    {
        (data.as_ref().len() > self.filter_image_max_size).then_some(Rejection::ImageTooLarge)
    }
}

impl Default for Filter {
    fn default() -> Self { Self::new() }
}
