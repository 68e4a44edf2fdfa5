use anyhow::Result;
use std::env;
use worddb::tui::Options;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    // Handle help flag
    if args
        .first()
        .is_some_and(|a| a == "--help" || a == "-h" || a == "help")
    {
        print_help();
        return Ok(());
    }

    let opts = Options::parse(args)?;
    worddb::tui::run(opts).await
}

fn print_help() {
    println!(
        "worddb v{} - Terminal client for a word list server",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("USAGE:");
    println!("    worddb [--root <dir>] [--page <file.json>]");
    println!();
    println!("OPTIONS:");
    println!("    --root <dir>        Keep config and log under <dir> instead of the user dirs");
    println!("    --page <file.json>  Start from the lists and words in <file.json>");
    println!("    --help              Show this help message");
    println!();
    println!("PAGE FILE:");
    println!("    {{\"lists\": [{{\"listid\": 1, \"label\": \"latin\", \"description\": \"\",");
    println!("               \"words\": [{{\"wordid\": 7, \"word\": \"cat\", \"meaning\": \"feline\",");
    println!("                           \"origin\": \"latin\"}}]}}]}}");
    println!();
    println!("KEYBINDINGS:");
    println!("    a / A             Add word to the selected list / new list");
    println!("    e, Enter          Edit the selected word or list");
    println!("    Enter, Ctrl+S     Save the open form");
    println!("    Ctrl+D            Remove the word or list being edited");
    println!("    Ctrl+R            Retry the newest failed request from inside a form");
    println!("    Esc               Close the form");
    println!("    g                 Show the selected list's page address");
    println!("    x / R             Dismiss newest message / retry failed request");
    println!("    ?                 Toggle help, q quits");
}
