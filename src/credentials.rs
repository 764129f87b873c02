/// A fixed (email, password) pair accepted at login.
#[derive(Debug, Clone)]
pub struct Credential {
    pub email: String,
    pub password: String,
}

/// Static in-memory credential list, loaded once at process start and never
/// mutated. There is no hashing; lookup is an exact match on both fields.
#[derive(Debug)]
pub struct CredentialStore {
    credentials: Vec<Credential>,
}

impl CredentialStore {
    pub fn new(credentials: Vec<Credential>) -> Self {
        CredentialStore { credentials }
    }

    /// The simulated login base shipped with the service.
    pub fn seeded() -> Self {
        CredentialStore::new(vec![
            Credential {
                email: "msalifou@orangebank.ci".to_string(),
                password: "1234567".to_string(),
            },
            Credential {
                email: "martial.ehui@orangebank.ci".to_string(),
                password: "1234567".to_string(),
            },
        ])
    }

    pub fn find(&self, email: &str, password: &str) -> Option<&Credential> {
        self.credentials
            .iter()
            .find(|c| c.email == email && c.password == password)
    }
}
