//! Console input parsing and error modeling.

use shared::{
    domain::{DetailSection, ProductId, QuickReplyId},
    error::{DispatchError, ErrorCode},
    protocol::ViewEvent,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    View(ViewEvent),
    Show,
    Products,
    Flush,
    Json,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  show                  render the product page and chat panel
  products              list the catalog
  select <id>           switch to another wine
  say <text>            send a chat message
  quick <id>            send a quick reply
  toggle | open | close expand or collapse the chat
  details               jump from the chat back to the product page
  cart                  add the current wine to the cart
  section <name>        expand/collapse a product section
  image <n>             show image n (starting at 1)
  flush                 deliver pending assistant replies now
  json                  print the session snapshot as JSON
  quit";

pub fn parse_command(line: &str) -> Result<ConsoleCommand, ConsoleError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "show" | "" => ConsoleCommand::Show,
        "products" | "ls" => ConsoleCommand::Products,
        "flush" => ConsoleCommand::Flush,
        "json" => ConsoleCommand::Json,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        "select" => ConsoleCommand::View(ViewEvent::SelectProduct {
            product_id: ProductId(parse_id(rest, "product id")?),
        }),
        "say" => {
            // The input box refuses blank messages; the session itself would accept them.
            if rest.is_empty() {
                return Err(ConsoleError::validation("message text must not be empty"));
            }
            ConsoleCommand::View(ViewEvent::SendMessage {
                text: rest.to_string(),
            })
        }
        "quick" => ConsoleCommand::View(ViewEvent::SelectQuickReply {
            reply_id: QuickReplyId(parse_id(rest, "quick reply id")?),
        }),
        "toggle" => ConsoleCommand::View(ViewEvent::ToggleChat),
        "open" => ConsoleCommand::View(ViewEvent::OpenChat),
        "close" => ConsoleCommand::View(ViewEvent::CloseChat),
        "details" => ConsoleCommand::View(ViewEvent::ViewProductDetails),
        "cart" => ConsoleCommand::View(ViewEvent::ConfirmAddToCart),
        "section" => ConsoleCommand::View(ViewEvent::ToggleSection {
            section: DetailSection::parse(rest).ok_or_else(|| {
                ConsoleError::validation(format!("unknown section '{rest}'"))
            })?,
        }),
        "image" => {
            let position = parse_id(rest, "image number")?;
            if position < 1 {
                return Err(ConsoleError::validation("image numbers start at 1"));
            }
            ConsoleCommand::View(ViewEvent::ShowImage {
                index: (position - 1) as usize,
            })
        }
        other => {
            return Err(ConsoleError::validation(format!(
                "unknown command '{other}'; type 'help'"
            )))
        }
    };

    Ok(command)
}

fn parse_id(raw: &str, what: &str) -> Result<i64, ConsoleError> {
    raw.parse::<i64>()
        .map_err(|_| ConsoleError::validation(format!("missing or invalid {what}: '{raw}'")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleErrorCategory {
    Validation,
    NotFound,
    Unavailable,
}

#[derive(Debug, Clone)]
pub struct ConsoleError {
    category: ConsoleErrorCategory,
    message: String,
}

impl ConsoleError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            category: ConsoleErrorCategory::Validation,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ConsoleErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<DispatchError> for ConsoleError {
    fn from(err: DispatchError) -> Self {
        let category = match err.code {
            ErrorCode::NotFound => ConsoleErrorCategory::NotFound,
            ErrorCode::Validation => ConsoleErrorCategory::Validation,
            ErrorCode::Unavailable => ConsoleErrorCategory::Unavailable,
        };
        Self {
            category,
            message: err.message,
        }
    }
}
