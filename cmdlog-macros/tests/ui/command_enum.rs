use cmdlog::command::{Command, command};

#[command(name = "account")]
enum AccountCommand {
    Open { owner: String, password: String },
    Close { id: u64 },
}

fn main() {
    assert_eq!(AccountCommand::NAME, "account");

    // 外部标记的枚举：根对象只有变体名一个字段，浅层脱敏不会触及内部字段
    let open = AccountCommand::Open {
        owner: "alice".into(),
        password: "pw".into(),
    };
    let json = cmdlog::RedactingSerializer::default().serialize(&open).unwrap();
    assert_eq!(json, r#"{"Open":{"owner":"alice","password":"pw"}}"#);

    let recursive = cmdlog::RedactingSerializer::default()
        .with_depth(cmdlog::redaction::RedactionDepth::Recursive);
    let json = recursive.serialize(&open).unwrap();
    assert_eq!(json, r#"{"Open":{"owner":"alice","password":"---"}}"#);

    let _ = format!("{:?}", AccountCommand::Close { id: 1 });
}
