use std::process::Command;

fn smoke_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_riscv-smoke"))
}

#[test]
fn test_default_run_prints_greeting_and_exits_zero() {
    let out = smoke_bin().output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "Hello World\n");
    assert!(out.stderr.is_empty());
}

#[test]
fn test_dump_writes_the_image() {
    let path = std::env::temp_dir().join("riscv-smoke-dump-test.bin");
    let out = smoke_bin().arg("--dump").arg(&path).output().unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8(out.stdout).unwrap(), "Hello World\n");

    let image = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(image.len(), 56);
    assert_eq!(image, riscv_smoke::smoke_image().unwrap());
}

#[test]
fn test_listing_precedes_greeting() {
    let out = smoke_bin().arg("--listing").output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.starts_with(".insn r 0x63, 0x2, 0x5, x3, x4, x5\n"));
    assert!(stdout.ends_with("nop\n.insn cr 0x2, 0x9, x1, x2\n.insn ci 0x1, 0x0, x3, 14\n.insn css 0x2, 0x6, x4, 15\n.insn ciw 0x0, 0x0, x8, 16\n.insn cl 0x0, 0x6, x9, 6(x11)\n.insn cs 0x1, 0x4, x9, 5(x10)\n.insn cb 0x1, 0x6, x9, 8\n.insn cj 0x1, 0x5, 92\nHello World\n"));
}

#[test]
fn test_dump_failure_keeps_exit_status_and_greeting() {
    let path = std::env::temp_dir()
        .join("riscv-smoke-no-such-dir")
        .join("image.bin");
    let out = smoke_bin().arg("--dump").arg(&path).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.ends_with("Hello World\n"));
    // The I/O error is reported before the greeting.
    assert!(stdout.lines().count() > 1);
}
