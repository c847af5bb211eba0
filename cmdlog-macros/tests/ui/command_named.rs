use cmdlog::command::{Command, command};

// 显式 serde(crate) 时宏不再追加
#[command(name = "post.create")]
#[serde(rename_all = "PascalCase", crate = "::cmdlog::__private::serde")]
struct CreatePost {
    title: String,
    body: String,
}

#[command(name = "wrap")]
struct Wrapper<T: serde::Serialize + Send + Sync + 'static>(T);

fn main() {
    assert_eq!(CreatePost::NAME, "post.create");
    assert_eq!(<Wrapper<u8> as Command>::NAME, "wrap");

    let post = CreatePost {
        title: "Hello".into(),
        body: "World".into(),
    };
    let json = cmdlog::RedactingSerializer::default().serialize(&post).unwrap();
    assert_eq!(json, r#"{"Title":"Hello","Body":"World"}"#);

    let json = cmdlog::RedactingSerializer::default().serialize(&Wrapper(7u8)).unwrap();
    assert_eq!(json, "7");
}
