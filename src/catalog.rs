//! Example questions offered by the frontend

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExampleQuestion {
    pub question: &'static str,
    pub category: &'static str,
    pub description: &'static str,
}

pub const EXAMPLE_QUESTIONS: &[ExampleQuestion] = &[
    ExampleQuestion {
        question: "List all characters who are Hobbits",
        category: "Characters",
        description: "Find every character of the Hobbit race",
    },
    ExampleQuestion {
        question: "Which characters appear in Fellowship of the Ring?",
        category: "Movies",
        description: "Characters appearing in the first movie",
    },
    ExampleQuestion {
        question: "How many Elves are in the movies?",
        category: "Statistics",
        description: "Count characters of the Elf race",
    },
    ExampleQuestion {
        question: "Who are the members of the Fellowship?",
        category: "Fellowship",
        description: "Members of the Fellowship of the Ring",
    },
    ExampleQuestion {
        question: "What movies are in the database?",
        category: "Movies",
        description: "List every available movie",
    },
];
