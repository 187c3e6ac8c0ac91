//! trybuild 编译期测试：派生宏生成的代码应能在独立 crate 中编译

#[test]
fn trybuild_injectable_derive() {
    let t = trybuild::TestCases::new();
    t.pass("tests/trybuild/injectable_ok.rs");
    t.pass("tests/trybuild/module_ok.rs");
}
