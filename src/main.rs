use clap::{Args, Parser, Subcommand};
use log::debug;
use std::error::Error;
use std::io::{self, BufRead, Write};

use recipe_client::{
    ApiClient, Category, CategoryList, CategoryResource, ClientConfig, Confirm, ListController,
    ListState, NutritionSession, Recipe, RecipeFilter, RecipeId, RecipeList, RecipeResource,
    Removal, Subrecipe, SubrecipeList, SubrecipeResource,
};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(
    name = "recipe-client",
    about = "Browse and edit recipes on a recipe backend"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API base URL (overrides RECIPE_API_URL and config files)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Recipe commands
    Recipes {
        #[command(subcommand)]
        action: RecipeCommand,
    },
    /// Category commands
    Categories {
        #[command(subcommand)]
        action: CategoryCommand,
    },
    /// Subrecipe commands
    Subrecipes {
        #[command(subcommand)]
        action: SubrecipeCommand,
    },
    /// Ask for an AI nutrition estimate
    Nutrition {
        /// Build the prompt from this recipe
        #[arg(long)]
        recipe: Option<String>,
        /// Free-form recipe text
        text: Option<String>,
    },
}

#[derive(Subcommand)]
enum RecipeCommand {
    /// List recipes, optionally filtered
    List {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        ingredient: Option<String>,
    },
    /// Show one recipe
    Show { id: String },
    /// Create a recipe
    Create(RecipeFields),
    /// Replace a recipe
    Update {
        id: String,
        #[command(flatten)]
        fields: RecipeFields,
    },
    /// Delete a recipe
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct RecipeFields {
    #[arg(long)]
    name: String,
    #[arg(long = "ingredient")]
    ingredients: Vec<String>,
    #[arg(long = "step")]
    instructions: Vec<String>,
    #[arg(long = "category")]
    categories: Vec<String>,
    #[arg(long = "subrecipe")]
    subrecipes: Vec<String>,
}

impl From<RecipeFields> for Recipe {
    fn from(fields: RecipeFields) -> Self {
        Recipe {
            id: None,
            name: fields.name,
            ingredients: fields.ingredients,
            instructions: fields.instructions,
            categories: fields.categories,
            subrecipes: fields.subrecipes,
        }
    }
}

#[derive(Subcommand)]
enum CategoryCommand {
    List,
    Add {
        name: String,
    },
    Delete {
        name: String,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum SubrecipeCommand {
    List,
    Add {
        name: String,
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
    },
    Update {
        name: String,
        /// New name, if renaming
        #[arg(long)]
        rename: Option<String>,
        #[arg(long = "ingredient")]
        ingredients: Vec<String>,
    },
    Delete {
        name: String,
        #[arg(long)]
        yes: bool,
    },
}

/// Asks on stdin unless `--yes` was given
struct StdinConfirm {
    assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim(), "y" | "Y" | "yes")
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult {
    let mut config = ClientConfig::load()?;
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    debug!("using API at {}", config.base_url);
    let client = ApiClient::from_config(&config)?;

    match cli.command {
        Command::Recipes { action } => run_recipes(&client, action).await,
        Command::Categories { action } => run_categories(&client, action).await,
        Command::Subrecipes { action } => run_subrecipes(&client, action).await,
        Command::Nutrition { recipe, text } => run_nutrition(&client, recipe, text).await,
    }
}

async fn run_recipes(client: &ApiClient, action: RecipeCommand) -> CliResult {
    let mut list: RecipeList = ListController::new(RecipeResource::new(client.clone()));

    match action {
        RecipeCommand::List {
            name,
            category,
            ingredient,
        } => {
            loaded(list.load().await)?;
            let filter = RecipeFilter::new()
                .name(name.unwrap_or_default())
                .category(category.unwrap_or_default())
                .ingredient(ingredient.unwrap_or_default());
            let recipes = list.filtered(&filter);
            if recipes.is_empty() {
                println!("No recipes found.");
            }
            for recipe in &recipes {
                print_recipe_row(recipe);
            }
        }
        RecipeCommand::Show { id } => {
            let recipe = list.source().get(&id).await?;
            print_recipe(&recipe);
        }
        RecipeCommand::Create(fields) => {
            let created = list.add(fields.into()).await?;
            print_recipe(&created);
        }
        RecipeCommand::Update { id, fields } => {
            let recipe = Recipe {
                id: Some(RecipeId::new(id.clone())),
                ..Recipe::from(fields)
            };
            let updated = list.replace(&id, recipe).await?;
            print_recipe(&updated);
        }
        RecipeCommand::Delete { id, yes } => {
            let outcome = list.remove(&id, &StdinConfirm { assume_yes: yes }).await?;
            report_removal("recipe", &id, outcome);
        }
    }
    Ok(())
}

async fn run_categories(client: &ApiClient, action: CategoryCommand) -> CliResult {
    let mut list: CategoryList = ListController::new(CategoryResource::new(client.clone()));

    match action {
        CategoryCommand::List => {
            loaded(list.load().await)?;
            if list.items().is_empty() {
                println!("No categories defined.");
            }
            for category in list.items() {
                println!("{}", category);
            }
        }
        CategoryCommand::Add { name } => {
            let created = list.add(Category::new(name)).await?;
            println!("Added category '{}'", created);
        }
        CategoryCommand::Delete { name, yes } => {
            let outcome = list.remove(&name, &StdinConfirm { assume_yes: yes }).await?;
            report_removal("category", &name, outcome);
        }
    }
    Ok(())
}

async fn run_subrecipes(client: &ApiClient, action: SubrecipeCommand) -> CliResult {
    let mut list: SubrecipeList =
        ListController::new(SubrecipeResource::new(client.clone()));

    match action {
        SubrecipeCommand::List => {
            loaded(list.load().await)?;
            if list.items().is_empty() {
                println!("No subrecipes defined.");
            }
            for sub in list.items() {
                print_subrecipe(sub);
            }
        }
        SubrecipeCommand::Add { name, ingredients } => {
            let created = list.add(Subrecipe { name, ingredients }).await?;
            print_subrecipe(&created);
        }
        SubrecipeCommand::Update {
            name,
            rename,
            ingredients,
        } => {
            let sub = Subrecipe {
                name: rename.unwrap_or_else(|| name.clone()),
                ingredients,
            };
            let updated = list.replace(&name, sub).await?;
            print_subrecipe(&updated);
        }
        SubrecipeCommand::Delete { name, yes } => {
            let outcome = list.remove(&name, &StdinConfirm { assume_yes: yes }).await?;
            report_removal("subrecipe", &name, outcome);
        }
    }
    Ok(())
}

async fn run_nutrition(
    client: &ApiClient,
    recipe: Option<String>,
    text: Option<String>,
) -> CliResult {
    let mut session = NutritionSession::with_input(text.unwrap_or_default());
    if let Some(id) = recipe {
        session.prefill_from_recipe(client, &id).await?;
    }

    eprintln!("Analyzing...");
    let answer = session.analyze(client).await?;
    println!("{}", answer);
    Ok(())
}

fn loaded(state: &ListState) -> CliResult {
    match state {
        ListState::Error(message) => Err(message.clone().into()),
        _ => Ok(()),
    }
}

fn report_removal(noun: &str, key: &str, outcome: Removal) {
    match outcome {
        Removal::Declined => println!("Cancelled."),
        Removal::Removed | Removal::NotHeld => println!("Deleted {} '{}'", noun, key),
    }
}

fn print_recipe_row(recipe: &Recipe) {
    let id = recipe.id.as_ref().map(|id| id.as_str()).unwrap_or("-");
    println!(
        "{:<6} {:<30} [{}] ({})",
        id,
        recipe.name,
        recipe.categories.join(", "),
        recipe.subrecipes.join(", ")
    );
}

fn print_recipe(recipe: &Recipe) {
    if let Some(id) = &recipe.id {
        println!("#{} {}", id, recipe.name);
    } else {
        println!("{}", recipe.name);
    }
    if !recipe.categories.is_empty() {
        println!("Categories: {}", recipe.categories.join(", "));
    }
    if !recipe.subrecipes.is_empty() {
        println!("Subrecipes: {}", recipe.subrecipes.join(", "));
    }
    println!("Ingredients:");
    for ing in &recipe.ingredients {
        println!("  - {}", ing);
    }
    println!("Instructions:");
    for (idx, step) in recipe.instructions.iter().enumerate() {
        println!("  {}. {}", idx + 1, step);
    }
}

fn print_subrecipe(sub: &Subrecipe) {
    println!("{}", sub.name);
    for ing in &sub.ingredients {
        println!("  - {}", ing);
    }
}
