//! Response cookies.

/// A cookie set on the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub secure: bool,
}

impl Cookie {
    /// Cookie scoped to `/`, secure.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_path(name, value, "/", true)
    }

    pub fn with_path(
        name: impl Into<String>,
        value: impl Into<String>,
        path: impl Into<String>,
        secure: bool,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: path.into(),
            secure,
        }
    }

    /// Value of the `Set-Cookie` header.
    pub fn to_header_value(&self) -> String {
        let mut header = format!("{}={}; Path={}", self.name, self.value, self.path);
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }
}
