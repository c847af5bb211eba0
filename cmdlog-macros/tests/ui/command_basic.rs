use cmdlog::command::{Command, command};

#[command]
struct ChangePassword {
    username: String,
    password: String,
}

#[command]
#[derive(Clone)]
struct Ping;

fn main() {
    assert_eq!(ChangePassword::NAME, "ChangePassword");
    assert_eq!(Ping::NAME, "Ping");

    // Debug 与 Serialize 由宏派生，调用方无需依赖 serde
    let cmd = ChangePassword {
        username: "alice".into(),
        password: "hunter2".into(),
    };
    let _ = format!("{:?}", cmd);

    let json = cmdlog::redaction::serialize_redacted(&cmd, &cmdlog::RedactionSet::default()).unwrap();
    assert_eq!(json, r#"{"username":"alice","password":"---"}"#);

    let _ = Ping.clone();
}
