//! User commands typed at the prompt.

/// A line of user input, interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    /// Send the text as a chat message
    Send(String),
    /// Flip the room's write permission (owners only)
    TogglePermission,
    /// Leave the room
    Quit,
}

impl UserCommand {
    /// Interpret an input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        match line {
            "" => None,
            "/toggle" => Some(Self::TogglePermission),
            "/quit" | "/exit" => Some(Self::Quit),
            text => Some(Self::Send(text.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        // テスト項目: 入力行がコマンドとして解釈される
        // given (前提条件):
        let inputs = ["  hello ", "/toggle", "/quit", "/exit", "   "];

        // when (操作):
        let parsed: Vec<Option<UserCommand>> =
            inputs.iter().map(|line| UserCommand::parse(line)).collect();

        // then (期待する結果):
        assert_eq!(
            parsed,
            vec![
                Some(UserCommand::Send("hello".to_string())),
                Some(UserCommand::TogglePermission),
                Some(UserCommand::Quit),
                Some(UserCommand::Quit),
                None,
            ]
        );
    }
}
