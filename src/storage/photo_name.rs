use std::fmt;

/// 写真ファイル名の形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameForm {
    /// `PHOTO_#####.jpeg`
    Long,
    /// `P#####.JPG`（長いファイル名が使えないボリューム用）
    Short,
}

/// 5 桁ゼロ埋めの写真番号とファイル名形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoName {
    id: u32,
    form: NameForm,
}

impl PhotoName {
    pub const ID_MODULUS: u32 = 100_000;

    const LONG_PREFIX: &'static str = "photo_";
    const LONG_EXT: &'static str = ".jpeg";
    const SHORT_PREFIX: &'static str = "p";
    const SHORT_EXT: &'static str = ".jpg";

    /// `id` は 100000 で剰余を取る
    pub fn new(id: u32, form: NameForm) -> Self {
        PhotoName {
            id: id % Self::ID_MODULUS,
            form,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn form(&self) -> NameForm {
        self.form
    }

    /// 次の番号（99999 の次は 0）
    pub fn next(&self) -> Self {
        PhotoName::new(self.id + 1, self.form)
    }

    pub fn with_form(&self, form: NameForm) -> Self {
        PhotoName { id: self.id, form }
    }

    /// どちらかの形式に一致するファイル名から番号を取り出す（大文字小文字は区別しない）
    pub fn parse(name: &str) -> Option<PhotoName> {
        let lower = name.to_ascii_lowercase();
        let (digits, form) = if let Some(rest) = lower.strip_prefix(Self::LONG_PREFIX) {
            (rest.strip_suffix(Self::LONG_EXT)?, NameForm::Long)
        } else if let Some(rest) = lower.strip_prefix(Self::SHORT_PREFIX) {
            (rest.strip_suffix(Self::SHORT_EXT)?, NameForm::Short)
        } else {
            return None;
        };

        if digits.len() != 5 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(|id| PhotoName { id, form })
    }
}

impl fmt::Display for PhotoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.form {
            NameForm::Long => write!(f, "PHOTO_{:05}.jpeg", self.id),
            NameForm::Short => write!(f, "P{:05}.JPG", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_both_templates() {
        assert_eq!(PhotoName::new(5, NameForm::Long).to_string(), "PHOTO_00005.jpeg");
        assert_eq!(PhotoName::new(5, NameForm::Short).to_string(), "P00005.JPG");
        assert_eq!(PhotoName::new(99_999, NameForm::Long).to_string(), "PHOTO_99999.jpeg");
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(
            PhotoName::parse("photo_00042.JPEG"),
            Some(PhotoName::new(42, NameForm::Long))
        );
        assert_eq!(
            PhotoName::parse("p00007.jpg"),
            Some(PhotoName::new(7, NameForm::Short))
        );
    }

    #[test]
    fn rejects_non_matching_names() {
        for name in [
            "PHOTO_0001.jpeg",
            "PHOTO_000001.jpeg",
            "PHOTO_00001.jpg",
            "P00001.jpeg",
            "PX0001.JPG",
            "IMG_00001.jpeg",
            "PHOTO_0000a.jpeg",
            "P+0001.JPG",
        ] {
            assert_eq!(PhotoName::parse(name), None, "{}", name);
        }
    }

    #[test]
    fn id_wraps_at_modulus() {
        assert_eq!(PhotoName::new(99_999, NameForm::Long).next().id(), 0);
        assert_eq!(PhotoName::new(100_003, NameForm::Short).id(), 3);
    }
}
