#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod temp_files {
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    /// Creates a temporary file with the given extension; removed on drop
    pub fn create_temp_file(content: &str, ext: &str) -> NamedTempFile {
        let mut file = Builder::new()
            .prefix("apirouter_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file.flush().expect("flush temp file");
        file
    }

    pub fn create_temp_yaml(content: &str) -> NamedTempFile {
        create_temp_file(content, "yaml")
    }

    pub fn create_temp_json(content: &str) -> NamedTempFile {
        create_temp_file(content, "json")
    }
}

pub mod fixtures {
    /// Users handler with one implicit action and one override, plus a
    /// high-priority health check and a class with no route.
    pub const USERS_MANIFEST: &str = r#"
handlers:
  - class: App\Presenters\UsersPresenter
    annotations:
      route:
        path: /users/<id>
        parameters:
          id: { type: int, requirement: '\d+' }
        format: xml
        section: Users
        priority: 5
      description: User resource
      inject: true
    methods:
      - actionShow
      - name: actionDelete
        annotations:
          route: { method: DELETE }
          description: Remove a user
  - class: App\Presenters\HealthPresenter
    annotations:
      route: { path: /health, priority: -1 }
    methods: [actionRead]
  - class: App\Presenters\PlainPresenter
    methods: [actionDefault]
"#;

    /// Same shape, but the override declares an unknown property
    pub const BROKEN_MANIFEST: &str = r#"
handlers:
  - class: App\Presenters\UsersPresenter
    annotations:
      route: { path: /users/<id> }
    methods:
      - actionShow
      - name: actionDelete
        annotations:
          route: { method: DELETE, colour: red }
"#;
}
