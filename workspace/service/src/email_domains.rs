/// Decides whether an email belongs to the institution, by domain suffix.
///
/// A configured `school.fr` matches `a@school.fr` and `a@eleves.school.fr`, but not
/// `a@notschool.fr`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailClassifier {
    internal_domains: Vec<String>,
}

impl EmailClassifier {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let internal_domains = domains
            .into_iter()
            .map(|d| {
                d.as_ref()
                    .trim()
                    .trim_start_matches('@')
                    .trim_start_matches('.')
                    .to_lowercase()
            })
            .filter(|d| !d.is_empty())
            .collect();
        Self { internal_domains }
    }

    pub fn domains(&self) -> &[String] {
        &self.internal_domains
    }

    pub fn is_internal(&self, email: &str) -> bool {
        let Some((_, domain)) = email.trim().rsplit_once('@') else {
            return false;
        };
        let domain = domain.to_lowercase();
        self.internal_domains.iter().any(|internal| {
            domain == *internal
                || domain
                    .strip_suffix(internal.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }

    pub fn is_external(&self, email: &str) -> bool {
        !self.is_internal(email)
    }
}
