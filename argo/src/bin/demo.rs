// Demo runner: a minimal embedding program for the tokenizer.

use argo::{print_help, terminal_width, tokenize, ArgOption, ArgType};

fn main() {
    let mut options = vec![
        ArgOption::new(ArgType::Boolean, "show this help and exit")
            .short('h')
            .long("help"),
        ArgOption::new(ArgType::Boolean, "verbose output")
            .short('v')
            .long("verbose"),
        ArgOption::new(ArgType::String, "output file")
            .short('o')
            .long("output"),
        ArgOption::new(ArgType::Integer, "iteration count")
            .short('n')
            .long("count"),
        ArgOption::new(ArgType::Float, "sampling ratio").long("ratio"),
    ];

    let argv: Vec<String> = std::env::args().collect();
    let unformatted = match tokenize(&mut options, &argv, false) {
        Ok(tail) => tail,
        Err(e) => {
            eprintln!("demo: {}", e);
            std::process::exit(1);
        }
    };

    if options[0].found {
        println!("usage: demo [OPTION...] [-- ARG...]");
        println!();
        print_help(&options);
        println!("(terminal width: {} columns)", terminal_width());
        return;
    }

    for opt in &options {
        let name = match (&opt.long_name, opt.short_name) {
            (Some(long), _) => long.clone(),
            (None, Some(short)) => short.to_string(),
            (None, None) => "(none)".to_string(),
        };
        match &opt.value {
            Some(value) => println!("{}: found={} value={:?}", name, opt.found, value),
            None => println!("{}: found={}", name, opt.found),
        }
    }

    if let Some(tail) = unformatted {
        println!("unformatted arguments: {:?}", tail);
    }
}
