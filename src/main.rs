use std::fs;
use std::path::Path;
use std::process;

use relex::document::{Accessor, Document};
use relex::format::{self, AnsiTheme};
use relex::{Language, cli, css, defaults, fold, tcl};

fn main() {
    let args = cli::parse_args();

    let text = match fs::read_to_string(&args.file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("relex: {}: {}", args.file, e);
            process::exit(1);
        }
    };

    let language = args.language.or_else(|| {
        Path::new(&args.file)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Language::from_extension)
    });
    let language = match language {
        Some(l) => l,
        None => {
            eprintln!(
                "relex: cannot infer language for {} (use --css, --less, --scss or --tcl)",
                args.file
            );
            process::exit(1);
        }
    };

    let mut doc = Document::new(&text);
    match language {
        Language::Less => doc.set_property("lexer.css.less.language", 1),
        Language::Scss => doc.set_property("lexer.css.scss.language", 1),
        _ => {}
    }

    match language {
        Language::Tcl => {
            let keywords = defaults::tcl_keywords();
            tcl::colorize(0, doc.len(), 0, &keywords, &mut doc);
        }
        _ => {
            let lists = defaults::css_word_lists();
            css::colorize(0, doc.len(), 0, &lists, &mut doc);
            css::fold(0, doc.len(), 0, &lists, &mut doc);
        }
    }

    if args.folds {
        print_folds(&doc, &text);
        return;
    }

    let theme = if args.plain {
        AnsiTheme::none()
    } else {
        AnsiTheme::dark()
    };
    let out = match language {
        Language::Tcl => format::render(&doc, |s| format::tcl_class(tcl::Style::from(s)), &theme),
        _ => format::render(&doc, |s| format::css_class(css::Style::from(s)), &theme),
    };
    print!("{}", out);
}

fn print_folds(doc: &Document, text: &str) {
    for (line, content) in text.lines().enumerate() {
        let level = doc.fold_level(line);
        let header = if level & fold::HEADER_FLAG != 0 { 'H' } else { ' ' };
        let blank = if level & fold::WHITE_FLAG != 0 { 'W' } else { ' ' };
        println!(
            "{:4} {}{} {}",
            fold::number(level).saturating_sub(fold::BASE),
            header,
            blank,
            content
        );
    }
}
