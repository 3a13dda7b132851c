use super::*;

fn token(kind: TokenKind, text: &str) -> Token {
    Token::new(kind, text, 1)
}

#[test]
fn lookup_names_and_aliases() {
    assert_eq!(Command::lookup("forward"), Some(Command::Forward));
    assert_eq!(Command::lookup("fd"), Some(Command::Forward));
    assert_eq!(Command::lookup("rp"), Some(Command::Repeat));
    assert_eq!(Command::lookup("penup"), Some(Command::PenUp));
    assert_eq!(Command::lookup("Forward"), None);
    assert_eq!(Command::lookup("fnord"), None);
}

#[test]
fn every_name_finds_its_command() {
    for cmd in Command::ALL {
        for name in cmd.names() {
            assert_eq!(Command::lookup(name), Some(*cmd), "{name}");
        }
        assert_eq!(cmd.to_string(), cmd.names()[0]);
    }
}

#[test]
fn unknown_command_error() {
    let err = "fnord".parse::<Command>().unwrap_err();
    assert_eq!(err, ParseError::UnknownCommand("fnord".to_string()));
    assert_eq!(err.to_string(), "fnord is not a recognized command");
}

#[test]
fn parameter_lists() {
    assert_eq!(Command::Forward.parameters(), [Param::Distance]);
    assert_eq!(Command::Repeat.parameters(), [Param::Times, Param::Statements]);
    assert!(Command::PenUp.parameters().is_empty());
    assert!(Command::Repeat.is_write_protected());
    assert!(!Command::Forward.is_write_protected());
}

#[test]
fn binds_numbers() {
    let mut instr = Instruction::new(0, Command::Forward);
    assert!(!instr.is_complete);
    let step = parse_call(&mut instr, &token(TokenKind::Whitespace, " ")).unwrap();
    assert_eq!(step, CallStep::Ignored);
    let step = parse_call(&mut instr, &token(TokenKind::Number, "2.5")).unwrap();
    assert_eq!(step, CallStep::Bound);
    assert!(instr.is_complete);
    assert_eq!(instr.number(Param::Distance), 2.5);
}

#[test]
fn negative_numbers_are_words_but_still_numbers() {
    let mut instr = Instruction::new(0, Command::Left);
    parse_call(&mut instr, &token(TokenKind::Word, "-45")).unwrap();
    assert_eq!(instr.number(Param::Angle), -45.0);
}

#[test]
fn rejects_words_for_numbers() {
    let mut instr = Instruction::new(3, Command::Forward);
    let err = parse_call(&mut instr, &token(TokenKind::Word, "far")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "forward expects a number as distance, got word `far`"
    );
    assert!(instr.collected_parameters.is_empty());
}

#[test]
fn repeat_needs_whole_number_then_block() {
    let mut instr = Instruction::new(0, Command::Repeat);
    let err = parse_call(&mut instr, &token(TokenKind::Number, "2.5")).unwrap_err();
    assert!(matches!(err, ParseError::NotAnInteger { .. }));

    parse_call(&mut instr, &token(TokenKind::Number, "4")).unwrap();
    assert_eq!(instr.next_param(), Some(Param::Statements));
    let err = parse_call(&mut instr, &token(TokenKind::Word, "fd")).unwrap_err();
    assert_eq!(
        err.to_string(),
        "repeat expects a block in `[` `]` as statements, got word `fd`"
    );
    let step = parse_call(&mut instr, &token(TokenKind::BracketOpen, "[")).unwrap();
    assert_eq!(step, CallStep::OpenBlock(Param::Statements));
}

#[test]
fn repeat_count_is_bounded() {
    let mut instr = Instruction::new(0, Command::Repeat);
    let err = parse_call(&mut instr, &token(TokenKind::Number, "1000000000000")).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("repeat accepts at most {MAX_TIMES} as times, got `1000000000000`")
    );
    assert!(instr.collected_parameters.is_empty());

    let limit = MAX_TIMES.to_string();
    assert_eq!(
        parse_call(&mut instr, &token(TokenKind::Number, &limit)),
        Ok(CallStep::Bound)
    );
}
