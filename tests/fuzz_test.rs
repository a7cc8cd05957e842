//! Property-based tests for the VM translator.
//!
//! Uses proptest to generate arbitrary VM programs and verify the
//! translator never panics, accepts every well-formed command, rejects
//! malformed ones, and keeps its generated labels unique.

use proptest::prelude::*;
use vm2hack::translate;

/// Generate arbitrary arithmetic commands
fn arb_arithmetic() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("add".to_string()),
        Just("sub".to_string()),
        Just("neg".to_string()),
        Just("eq".to_string()),
        Just("lt".to_string()),
        Just("gt".to_string()),
        Just("and".to_string()),
        Just("or".to_string()),
        Just("not".to_string()),
    ]
}

/// Generate valid push commands
fn arb_push() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u16..32768).prop_map(|n| format!("push constant {}", n)),
        (0u16..8).prop_map(|n| format!("push temp {}", n)),
        (0u16..2).prop_map(|n| format!("push pointer {}", n)),
        (0u16..100).prop_map(|n| format!("push local {}", n)),
        (0u16..100).prop_map(|n| format!("push argument {}", n)),
        (0u16..100).prop_map(|n| format!("push this {}", n)),
        (0u16..100).prop_map(|n| format!("push that {}", n)),
        (0u16..240).prop_map(|n| format!("push static {}", n)),
    ]
}

/// Generate valid pop commands
fn arb_pop() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u16..8).prop_map(|n| format!("pop temp {}", n)),
        (0u16..2).prop_map(|n| format!("pop pointer {}", n)),
        (0u16..100).prop_map(|n| format!("pop local {}", n)),
        (0u16..100).prop_map(|n| format!("pop argument {}", n)),
        (0u16..100).prop_map(|n| format!("pop this {}", n)),
        (0u16..100).prop_map(|n| format!("pop that {}", n)),
        (0u16..240).prop_map(|n| format!("pop static {}", n)),
    ]
}

/// Generate valid label names
fn arb_label_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_.:]{0,10}".prop_map(|s| s)
}

/// Generate branching commands
fn arb_branching() -> impl Strategy<Value = String> {
    arb_label_name().prop_flat_map(|name| {
        prop_oneof![
            Just(format!("label {}", name)),
            Just(format!("goto {}", name)),
            Just(format!("if-goto {}", name)),
        ]
    })
}

/// Generate function names
fn arb_function_name() -> impl Strategy<Value = String> {
    ("[A-Z][a-zA-Z0-9]*", "[a-z][a-zA-Z0-9]*")
        .prop_map(|(class, method)| format!("{}.{}", class, method))
}

/// Generate function commands
fn arb_function_cmd() -> impl Strategy<Value = String> {
    (arb_function_name(), 0u16..10).prop_map(|(name, n)| format!("function {} {}", name, n))
}

/// Generate call commands
fn arb_call_cmd() -> impl Strategy<Value = String> {
    (arb_function_name(), 0u16..10).prop_map(|(name, n)| format!("call {} {}", name, n))
}

/// Generate any valid VM command
fn arb_valid_vm_line() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => arb_arithmetic(),
        4 => arb_push(),
        3 => arb_pop(),
        2 => arb_branching(),
        1 => arb_function_cmd(),
        1 => arb_call_cmd(),
        1 => Just("return".to_string()),
    ]
}

/// Generate arbitrary VM lines including invalid ones
fn arb_vm_line() -> impl Strategy<Value = String> {
    prop_oneof![
        8 => arb_valid_vm_line(),
        1 => Just("// This is a comment".to_string()),
        1 => Just("".to_string()),
        1 => Just("   ".to_string()),
        // Garbage that must produce errors, not panics
        1 => "[a-z]{3,10}".prop_map(|s| s),
        1 => "push [a-z]+ [0-9]+".prop_map(|s| s),
        1 => "pop constant [0-9]+".prop_map(|s| s),
    ]
}

/// Generate a VM program (multiple lines)
fn arb_vm_program() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_vm_line(), 0..50).prop_map(|lines| lines.join("\n"))
}

proptest! {
    /// The translator never panics, whatever the input.
    #[test]
    fn test_no_panic_on_arbitrary_input(input in arb_vm_program()) {
        let _ = translate(&input, "Test");
    }

    /// Any single well-formed command translates.
    #[test]
    fn test_valid_command_succeeds(line in arb_valid_vm_line()) {
        prop_assert!(translate(&line, "Test").is_ok());
    }

    #[test]
    fn test_push_constant_emits_the_literal(n in 0u16..32768) {
        let asm = translate(&format!("push constant {}", n), "Test").unwrap();
        let expected = format!("@{}\nD=A", n);
        prop_assert!(asm.contains(&expected));
    }

    #[test]
    fn test_invalid_temp_index(index in 8u16..100) {
        let vm_code = format!("push temp {}", index);
        prop_assert!(translate(&vm_code, "Test").is_err());
    }

    #[test]
    fn test_invalid_pointer_index(index in 2u16..100) {
        let vm_code = format!("push pointer {}", index);
        prop_assert!(translate(&vm_code, "Test").is_err());
    }

    #[test]
    fn test_pop_to_constant_fails(n in 0u16..32768) {
        let vm_code = format!("pop constant {}", n);
        prop_assert!(translate(&vm_code, "Test").is_err());
    }

    #[test]
    fn test_unknown_segment_fails(segment in "[b-z]{5,10}") {
        let vm_code = format!("push {} 5", segment);
        let result = translate(&vm_code, "Test");
        // "static" is the only 5-10 letter segment without 'a'
        if segment != "static" && segment != "this" && segment != "that" {
            prop_assert!(result.is_err());
        }
    }

    /// Inserting blank lines and comments never changes the output.
    #[test]
    fn test_noise_insensitivity(
        lines in prop::collection::vec(arb_valid_vm_line(), 1..15),
        seed in 0usize..4,
    ) {
        let plain = lines.join("\n");
        let noisy: Vec<String> = lines
            .iter()
            .enumerate()
            .flat_map(|(i, line)| {
                let mut group = Vec::new();
                if (i + seed) % 2 == 0 {
                    group.push("".to_string());
                    group.push("// noise".to_string());
                }
                group.push(format!("{} // trailing", line));
                group
            })
            .collect();

        prop_assert_eq!(
            translate(&plain, "Test").unwrap(),
            translate(&noisy.join("\n"), "Test").unwrap()
        );
    }

    /// Repeated comparisons count their generated labels up from zero.
    #[test]
    fn test_comparison_labels_count_up(comparison_count in 1usize..10) {
        let commands = vec!["push constant 5\npush constant 5\neq"; comparison_count];
        let asm = translate(&commands.join("\n"), "Test").unwrap();

        for i in 0..comparison_count {
            prop_assert_eq!(
                asm.matches(&format!("(IF_TRUE_.{})", i)).count(),
                1,
                "expected exactly one declaration of comparison label {}", i
            );
        }
    }

    #[test]
    fn test_static_naming(index in 0u16..240) {
        let asm = translate(&format!("push static {}", index), "TestFile").unwrap();
        let expected = format!("@TestFile.{}\nD=M", index);
        prop_assert!(asm.contains(&expected));
    }

    /// The number of initialized locals always matches the declaration.
    #[test]
    fn test_function_locals(num_locals in 0u16..10) {
        let asm = translate(&format!("function Test.main {}\nreturn", num_locals), "Test").unwrap();
        prop_assert_eq!(asm.matches("M=0").count(), num_locals as usize);
    }

    /// ARG lands 5 + n slots below the pre-call SP.
    #[test]
    fn test_call_args(num_args in 0u16..10) {
        let vm_code = format!(
            "function Test.main 0\ncall Other.func {}\nreturn\nfunction Other.func 0\nreturn",
            num_args
        );
        let asm = translate(&vm_code, "Test").unwrap();
        let expected = format!("@{}\nD=D-A\n@ARG\nM=D", num_args + 5);
        prop_assert!(asm.contains(&expected));
    }

    /// Each call site in a function gets its own return label.
    #[test]
    fn test_return_label_uniqueness(call_count in 1usize..5) {
        let calls = vec!["call Other.func 0"; call_count].join("\n");
        let vm_code = format!(
            "function Test.main 0\n{}\nreturn\nfunction Other.func 0\nreturn",
            calls
        );
        let asm = translate(&vm_code, "Test").unwrap();

        for i in 0..call_count {
            prop_assert_eq!(
                asm.matches(&format!("(RET_ADDR$Test.main.{})", i)).count(),
                1,
                "expected exactly one return label for call {}", i
            );
        }
    }

    /// Scoped user labels carry the enclosing function name.
    #[test]
    fn test_label_scoping(name in arb_label_name()) {
        let vm_code = format!("function Test.main 0\nlabel {}\ngoto {}\nreturn", name, name);
        let asm = translate(&vm_code, "Test").unwrap();
        let expected_label = format!("(Test.main${})", name);
        let expected_jmp = format!("@Test.main${}\n0;JMP", name);
        prop_assert!(asm.contains(&expected_label));
        prop_assert!(asm.contains(&expected_jmp));
    }

    #[test]
    fn test_if_goto_scoping(name in arb_label_name()) {
        let vm_code = format!(
            "function Test.main 0\npush constant 1\nif-goto {}\nlabel {}\nreturn",
            name, name
        );
        let asm = translate(&vm_code, "Test").unwrap();
        let expected = format!("@Test.main${}\nD;JNE", name);
        prop_assert!(asm.contains(&expected));
    }
}
