use std::path::PathBuf;

use spendbook_core::{
    export, CoreError, CurrencyFormatter, DashboardSummary, DateFormatter, ErrorKind,
    ExpenseFilter, SummaryService,
};
use spendbook_domain::{Displayable, Expense, ExpenseDraft, ExpensePatch, Identifiable};

use crate::utils::build_info;

use super::{
    args::{
        invalid, parse_amount, parse_category, parse_category_filter, parse_date, parse_day,
        ParsedArgs,
    },
    core::{CliMode, CommandError, CommandResult, ShellContext},
    output,
    registry::{CommandEntry, CommandRegistry},
};

/// Characters of the id shown in listings; any unique prefix is accepted back.
const SHORT_ID_LEN: usize = 8;

pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(CommandEntry::new(
        "add",
        "Record a new expense",
        "add <amount> <category> <description...> [--date YYYY-MM-DD]",
        cmd_add,
    ));
    registry.register(CommandEntry::new(
        "list",
        "List expenses, newest first",
        "list [--search text] [--category name|All] [--from date] [--to date]",
        cmd_list,
    ));
    registry.register(CommandEntry::new(
        "edit",
        "Change fields of an existing expense",
        "edit <id> [--amount n] [--category name] [--description text] [--date date]",
        cmd_edit,
    ));
    registry.register(CommandEntry::new(
        "delete",
        "Remove an expense",
        "delete <id> [--yes]",
        cmd_delete,
    ));
    registry.register(CommandEntry::new(
        "summary",
        "Show totals and the category breakdown",
        "summary",
        cmd_summary,
    ));
    registry.register(CommandEntry::new(
        "export",
        "Write all expenses to a CSV file",
        "export [path]",
        cmd_export,
    ));
    registry.register(CommandEntry::new(
        "config",
        "Show or change preferences",
        "config [show | set <key> <value>]",
        cmd_config,
    ));
    registry.register(CommandEntry::new(
        "version",
        "Show build information",
        "version",
        cmd_version,
    ));
    registry.register(CommandEntry::new(
        "help",
        "Show available commands",
        "help [command]",
        cmd_help,
    ));
    registry.register(CommandEntry::new("exit", "Leave the shell", "exit", cmd_exit));
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["date"], &[])?;
    let [amount, category, description @ ..] = parsed.positional.as_slice() else {
        return Err(usage_error(context, "add"));
    };
    if description.is_empty() {
        return Err(usage_error(context, "add"));
    }

    let amount = parse_amount(amount)?;
    let category = parse_category(category)?;
    let date = match parsed.value("date") {
        Some(raw) => parse_date(raw)?,
        None => context.store.clock().now(),
    };

    let draft = ExpenseDraft::new(amount, category, description.join(" "), date);
    let expense = context.store.create(draft)?;
    output::success(format!(
        "Added {} for {} ({}) [{}]",
        money(context, expense.amount),
        expense.description,
        expense.category,
        short_id(&expense.id)
    ));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["search", "category", "from", "to"], &[])?;
    if !parsed.positional.is_empty() {
        return Err(usage_error(context, "list"));
    }

    let mut filter = ExpenseFilter::new();
    if let Some(query) = parsed.value("search") {
        filter = filter.with_search(query);
    }
    if let Some(category) = parsed.value("category") {
        filter = filter.with_category(parse_category_filter(category)?);
    }
    let start = parsed.value("from").map(parse_day).transpose()?;
    let end = parsed.value("to").map(parse_day).transpose()?;
    filter = filter.between(start, end);

    let expenses = context.store.list_all()?;
    if expenses.is_empty() {
        output::info("No expenses recorded yet. Use `add` to record one.");
        return Ok(());
    }

    let visible = filter.apply(&expenses);
    if visible.is_empty() {
        output::info("No expenses match the current filters.");
        return Ok(());
    }

    for expense in &visible {
        output::info(list_row(context, expense));
    }
    output::info(format!(
        "\n{} of {} expenses, {} total",
        visible.len(),
        expenses.len(),
        money(context, SummaryService::total(&visible))
    ));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["amount", "category", "description", "date"], &[])?;
    let [id] = parsed.positional.as_slice() else {
        return Err(usage_error(context, "edit"));
    };

    let mut patch = ExpensePatch::default();
    if let Some(amount) = parsed.value("amount") {
        patch = patch.amount(parse_amount(amount)?);
    }
    if let Some(category) = parsed.value("category") {
        patch = patch.category(parse_category(category)?);
    }
    if let Some(description) = parsed.value("description") {
        patch = patch.description(description);
    }
    if let Some(date) = parsed.value("date") {
        patch = patch.date(parse_date(date)?);
    }
    if patch.is_empty() {
        return Err(invalid(
            "Nothing to change. Pass at least one of --amount, --category, --description or --date.",
        ));
    }

    let target = resolve_expense(context, id)?;
    let expense = context.store.update(target.id(), patch)?;
    output::success(format!("Updated [{}]", short_id(&expense.id)));
    output::info(list_row(context, &expense));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["yes"])?;
    let [id] = parsed.positional.as_slice() else {
        return Err(usage_error(context, "delete"));
    };

    let expense = match resolve_expense(context, id) {
        Ok(expense) => expense,
        Err(CommandError::App(app)) if app.kind() == ErrorKind::NotFound => {
            output::warning(format!("No expense matches `{id}`. Nothing deleted."));
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    if !parsed.has("yes") && !context.confirm(&format!("Delete {}?", expense.display_label()))? {
        output::info("Delete cancelled.");
        return Ok(());
    }

    context.store.delete(expense.id())?;
    output::success(format!("Deleted [{}]", short_id(expense.id())));
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage_error(context, "summary"));
    }

    let summary = dashboard(context)?;

    output::section("Summary");
    output::row("Total spent", money(context, summary.total), 12);
    output::row("This month", money(context, summary.current_month_total), 12);
    output::row("Top category", summary.top_category_label(), 12);
    output::row("Expenses", summary.count, 12);

    if summary.by_category.is_empty() {
        return Ok(());
    }

    output::section("By category");
    for entry in &summary.by_category {
        let share = if summary.total > 0.0 {
            entry.total / summary.total * 100.0
        } else {
            0.0
        };
        output::row(
            entry.category.as_str(),
            format!("{:>12}  {:>5.1}%", money(context, entry.total), share),
            14,
        );
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args {
        [] => PathBuf::from(export::export_file_name(context.store.clock().today())),
        [path] => PathBuf::from(*path),
        _ => return Err(usage_error(context, "export")),
    };

    let expenses = context.store.list_all()?;
    if expenses.is_empty() {
        output::warning("No expenses to export.");
        return Ok(());
    }

    let rows = export::export_to_path(&expenses, &path)?;
    output::success(format!("Exported {} expenses to {}", rows, path.display()));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            output::section("Configuration");
            for (key, value) in context.config.entries() {
                output::row(key, value, 16);
            }
            output::row(
                "data directory",
                context.config_manager.base_dir().display(),
                16,
            );
            output::row(
                "config file",
                context.config_manager.config_path().display(),
                16,
            );
            output::row(
                "expense file",
                context.config_manager.data_file(&context.config).display(),
                16,
            );
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            let key = key.to_ascii_lowercase();
            let mut updated = context.config.clone();
            updated.set_value(&key, &value.join(" "))?;
            context.config_manager.save(&updated)?;
            let previous = std::mem::replace(&mut context.config, updated);

            if previous.data_file != context.config.data_file {
                context.reload_store()?;
            }
            if key == "ui_color_enabled" {
                output::apply_color_preference(context.config.ui_color_enabled);
            }
            output::success(format!("Set {key}."));
            Ok(())
        }
        _ => Err(usage_error(context, "config")),
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Spendbook");
    for (label, value) in build_info::current().rows() {
        output::row(label, value, 10);
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let name = name.to_ascii_lowercase();
        let Some(entry) = context.registry.get(&name) else {
            context.suggest_command(&name);
            return Err(invalid(format!("Unknown command `{name}`.")));
        };
        output::info(format!("{}\n  usage: {}", entry.description, entry.usage));
        return Ok(());
    }

    output::section("Commands");
    for entry in context.registry.list() {
        output::row(entry.name, entry.description, 8);
    }
    if context.mode == CliMode::Interactive {
        output::hint("Press Tab or ? to complete command names.");
    }
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

/// Dashboard over the current snapshot. Months are UTC calendar months, the same
/// days the list view, filters and CSV export show.
fn dashboard(context: &ShellContext) -> Result<DashboardSummary, CommandError> {
    let expenses = context.store.list_all()?;
    Ok(SummaryService::summarize(
        &expenses,
        &context.store.clock().now(),
    ))
}

fn usage_error(context: &ShellContext, command: &str) -> CommandError {
    let usage = context
        .registry
        .get(command)
        .map(|entry| entry.usage)
        .unwrap_or(command);
    invalid(format!("Usage: {usage}"))
}

fn money(context: &ShellContext, amount: f64) -> String {
    context
        .formatter
        .format_amount(amount, &context.config.currency)
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

fn list_row(context: &ShellContext, expense: &Expense) -> String {
    format!(
        "{:<8}  {:<12}  {:<14}  {:>12}  {}",
        short_id(&expense.id),
        context.formatter.format_date(expense.date.date_naive()),
        expense.category.as_str(),
        money(context, expense.amount),
        expense.description
    )
}

/// Looks an expense up by its full id or a unique prefix of one.
fn resolve_expense(context: &ShellContext, input: &str) -> Result<Expense, CommandError> {
    let mut expenses = context.store.list_all()?;
    if let Some(idx) = expenses.iter().position(|expense| expense.id == input) {
        return Ok(expenses.swap_remove(idx));
    }

    let needle = input.to_ascii_lowercase();
    let mut matches = expenses
        .iter()
        .filter(|expense| !needle.is_empty() && expense.id.starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(expense), None) => Ok(expense.clone()),
        (Some(_), Some(_)) => Err(invalid(format!(
            "`{input}` matches more than one expense. Use a longer id."
        ))),
        (None, _) => Err(CoreError::ExpenseNotFound(input.to_string()).into()),
    }
}
