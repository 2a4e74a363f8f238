fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use dahouse_credentials::{CredentialRecord, Credentials};
    use dahouse_session::types::{LoginRequest, LoginResponse};
    use dahouse_session::{FieldValue, UserProfile};
    use dahouse_updates::ReleaseInfo;
    use dahouse_updates::types::LatestRelease;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    fn parse_fixture<T: serde::de::DeserializeOwned>(name: &str) -> T {
        serde_json::from_value(load_fixture(name))
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and compares
    /// the JSON values (order-independent comparison).
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  server: {fixture}\n  client: {reserialized}"
        );
    }

    // --- API bodies ---

    #[test]
    fn fixture_login_request() {
        roundtrip_test::<LoginRequest>("login_request.json");

        let request: LoginRequest = parse_fixture("login_request.json");
        assert_eq!(request.username, "alice");
    }

    #[test]
    fn login_request_uses_server_key() {
        let body = serde_json::to_value(LoginRequest {
            username: "bob".into(),
            password: "secret".into(),
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"nombre_usuario": "bob", "password": "secret"})
        );
    }

    #[test]
    fn fixture_login_response() {
        roundtrip_test::<LoginResponse>("login_response.json");
    }

    #[test]
    fn login_response_ignores_extra_fields() {
        let response: LoginResponse = parse_fixture("login_response_extra.json");
        assert_eq!(response.access_token.as_str(), "abc");
    }

    #[test]
    fn fixture_user_profile() {
        roundtrip_test::<UserProfile>("user_profile.json");

        let profile: UserProfile = parse_fixture("user_profile.json");
        assert_eq!(profile.id, Some(FieldValue::Integer(7)));
        assert_eq!(profile.shift, Some(FieldValue::Text("Mañana".into())));
        assert_eq!(
            profile.registered_at,
            Some(FieldValue::Text("2024-01-15 08:30:00".into()))
        );
    }

    #[test]
    fn fixture_user_profile_partial() {
        roundtrip_test::<UserProfile>("user_profile_partial.json");

        let profile: UserProfile = parse_fixture("user_profile_partial.json");
        assert!(profile.username.is_none());
        assert!(profile.role.is_none());
        assert!(profile.shift.is_none());
        assert!(profile.registered_at.is_none());
    }

    // --- Release endpoint ---

    #[test]
    fn fixture_latest_release() {
        let release: LatestRelease = parse_fixture("latest_release.json");
        let info = ReleaseInfo::from(release);
        assert_eq!(info.version, "0.0.2");
        assert_eq!(
            info.download_url,
            "https://github.com/zaindou/dahouse-gui/releases/tag/0.0.2"
        );
    }

    // --- Saved credentials ---

    #[test]
    fn fixture_credential_record() {
        roundtrip_test::<CredentialRecord>("credential_record.json");

        let record: CredentialRecord = parse_fixture("credential_record.json");
        assert_eq!(record.decode().unwrap(), Credentials::new("alice", "pw1"));
    }

    #[test]
    fn credential_record_encodes_like_fixture() {
        let record = CredentialRecord::encode(&Credentials::new("alice", "pw1"));
        assert_eq!(
            serde_json::to_value(record).unwrap(),
            load_fixture("credential_record.json")
        );
    }
}
