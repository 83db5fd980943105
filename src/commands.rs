//! Command handlers. Each one drives the library's pages and forms the way a screen would.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;

use library_admin::{
    forms::BorrowForm,
    forms::ReturnForm,
    import::{books::BookImport, students::StudentImport},
    models::{user::LoginRequest, BorrowStatus, Id, ItemCondition, ItemStatus},
    pages::{
        books::{book_item_list_page, book_list_page, AvailableItemOptions, BookDetailPage},
        categories::{category_list_page, category_option},
        dashboard::DashboardPage,
        librarians::librarian_list_page,
        list::{ListPage, ListSource, RowDelete},
        students::{student_list_page, StudentOptions},
        transactions::{borrow_list_page, overdue_list_page, return_list_page},
    },
    services::{books::BookFilter, students::StudentFilter, transactions::TransactionFilter},
    widgets::NoticeLevel,
    AppContext, AppError,
};

use crate::formatter::{
    format_book_drafts, format_page, format_rows, format_student_drafts, format_summary,
    print_notices, print_row_errors, OutputFormat, TableRow,
};

/// Paging and search options shared by list commands
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Search term
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page number
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Rows per page
    #[arg(long)]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Book,
    BookItem,
    Category,
    Student,
    Librarian,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and keep the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out and forget the session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Counters, overdue loans and popular titles
    Dashboard,
    /// List book titles
    Books {
        #[command(flatten)]
        list: ListArgs,
        /// Only titles of this category
        #[arg(long)]
        category: Option<Id>,
    },
    /// Show one title with its copies
    Book { id: Id },
    /// List students
    Students {
        #[command(flatten)]
        list: ListArgs,
        /// Only students of this class
        #[arg(long)]
        class: Option<String>,
    },
    /// List categories
    Categories {
        #[command(flatten)]
        list: ListArgs,
    },
    /// List librarians
    Librarians {
        #[command(flatten)]
        list: ListArgs,
    },
    /// List borrow transactions
    Borrows {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        status: Option<BorrowStatus>,
        /// Borrowed on or after (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Borrowed on or before (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// List return transactions
    Returns {
        #[command(flatten)]
        list: ListArgs,
    },
    /// List overdue borrow transactions
    Overdue {
        #[command(flatten)]
        list: ListArgs,
    },
    /// Delete a record
    Delete {
        #[arg(value_enum)]
        entity: Entity,
        id: Id,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Stage a book CSV and import the valid rows
    ImportBooks {
        file: PathBuf,
        /// Category applied to every row
        #[arg(long)]
        category: Option<Id>,
        /// Only show what would be imported
        #[arg(long)]
        dry_run: bool,
    },
    /// Stage a student CSV and import it
    ImportStudents {
        file: PathBuf,
        #[arg(long)]
        dry_run: bool,
    },
    /// Lend copies to a student
    Borrow {
        #[arg(long)]
        student: Id,
        /// Copy to lend; repeat for several
        #[arg(long = "item", required = true)]
        items: Vec<Id>,
        /// Loan duration in days
        #[arg(long)]
        days: Option<u32>,
        /// Borrow date (YYYY-MM-DD), today by default
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Return copies of a borrow transaction
    Return {
        #[arg(long)]
        borrow: Id,
        /// Copy to return; every outstanding copy when omitted
        #[arg(long = "item")]
        items: Vec<Id>,
        #[arg(long)]
        condition: Option<ItemCondition>,
        #[arg(long)]
        status: Option<ItemStatus>,
        /// Return date (YYYY-MM-DD), today by default
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Print the user-facing messages of an error and wrap it for the exit path
fn report(err: AppError, fallback: &str) -> anyhow::Error {
    for message in err.user_messages(fallback) {
        eprintln!("[error] {}", message);
    }
    anyhow::Error::new(err).context(fallback.to_string())
}

fn require_session(ctx: &AppContext) -> Result<()> {
    if !ctx.is_signed_in() {
        bail!("Not signed in. Run `library-admin login` first.");
    }
    Ok(())
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn run(ctx: &mut AppContext, command: Command, format: OutputFormat) -> Result<()> {
    match command {
        Command::Login { username, password } => login(ctx, username, password).await,
        Command::Logout => {
            ctx.sign_out().await.context("Failed to clear the stored session")?;
            println!("Signed out");
            Ok(())
        }
        Command::Whoami => whoami(ctx).await,
        command => {
            require_session(ctx)?;
            run_signed_in(ctx, command, format).await
        }
    }
}

async fn run_signed_in(ctx: &AppContext, command: Command, format: OutputFormat) -> Result<()> {
    let services = &ctx.services;
    let ui = &ctx.config.ui;

    match command {
        Command::Dashboard => dashboard(ctx, format).await,
        Command::Books { list, category } => {
            let filter = BookFilter {
                category_id: category,
            };
            show_list(book_list_page(services, ui), &list, filter, format).await
        }
        Command::Book { id } => book_detail(ctx, id, format).await,
        Command::Students { list, class } => {
            let filter = StudentFilter { class_name: class };
            show_list(student_list_page(services, ui), &list, filter, format).await
        }
        Command::Categories { list } => show_list(category_list_page(services, ui), &list, (), format).await,
        Command::Librarians { list } => show_list(librarian_list_page(services, ui), &list, (), format).await,
        Command::Borrows { list, status, from, to } => {
            let filter = TransactionFilter {
                status,
                date_from: from,
                date_to: to,
            };
            show_list(borrow_list_page(services, ui), &list, filter, format).await
        }
        Command::Returns { list } => {
            show_list(return_list_page(services, ui), &list, TransactionFilter::default(), format).await
        }
        Command::Overdue { list } => show_list(overdue_list_page(services, ui), &list, (), format).await,
        Command::Delete { entity, id, yes } => match entity {
            Entity::Book => delete(book_list_page(services, ui), id, yes).await,
            Entity::BookItem => delete(book_item_list_page(services, ui), id, yes).await,
            Entity::Category => delete(category_list_page(services, ui), id, yes).await,
            Entity::Student => delete(student_list_page(services, ui), id, yes).await,
            Entity::Librarian => delete(librarian_list_page(services, ui), id, yes).await,
        },
        Command::ImportBooks { file, category, dry_run } => import_books(ctx, &file, category, dry_run).await,
        Command::ImportStudents { file, dry_run } => import_students(ctx, &file, dry_run).await,
        Command::Borrow {
            student,
            items,
            days,
            date,
            notes,
        } => borrow(ctx, student, items, days, date, notes, format).await,
        Command::Return {
            borrow,
            items,
            condition,
            status,
            date,
            notes,
        } => return_items(ctx, borrow, items, condition, status, date, notes, format).await,
        Command::Login { .. } | Command::Logout | Command::Whoami => Ok(()),
    }
}

async fn login(ctx: &mut AppContext, username: String, password: String) -> Result<()> {
    let credentials = LoginRequest { username, password };
    let user = ctx
        .sign_in(&credentials)
        .await
        .map_err(|e| report(e, "Login failed"))?;
    println!("Signed in as {}", user.name);
    Ok(())
}

async fn whoami(ctx: &AppContext) -> Result<()> {
    let Some(user) = ctx.current_user() else {
        println!("Not signed in");
        return Ok(());
    };
    println!("{} (id {})", user.name, user.id);
    if let Some(email) = &user.email {
        println!("{}", email);
    }

    match ctx.services.auth.me().await {
        Ok(_) => Ok(()),
        Err(AppError::Unauthorized(_)) => {
            eprintln!("[error] The stored session is no longer valid, please log in again");
            Ok(())
        }
        Err(e) => {
            tracing::warn!("Could not verify session: {}", e);
            Ok(())
        }
    }
}

async fn show_list<S>(mut page: ListPage<S>, args: &ListArgs, filter: S::Filter, format: OutputFormat) -> Result<()>
where
    S: ListSource,
    S::Row: TableRow + Serialize,
{
    let list = &mut page.list;
    if let Some(per_page) = args.per_page {
        list.set_per_page(per_page);
    }
    list.set_filter(filter);
    if let Some(search) = &args.search {
        list.submit_search(search.as_str());
    }
    list.set_page(args.page);
    list.refresh().await;

    let failed = list.notices.iter().any(|n| n.level == NoticeLevel::Error);
    print_notices(list.notices.drain());
    if failed {
        bail!("Failed to load {}", list.source().name());
    }
    println!("{}", format_page(list.rows(), list.meta(), format));
    Ok(())
}

async fn delete<S: ListSource + RowDelete>(mut page: ListPage<S>, id: Id, yes: bool) -> Result<()> {
    let label = format!("{} #{}", page.list.source().name(), id);
    page.request_delete(id, &label);
    if !yes {
        eprintln!("{}", page.delete_dialog.message());
        eprintln!("Re-run with --yes to confirm");
        page.delete_dialog.cancel();
        return Ok(());
    }

    let deleted = page.confirm_delete().await;
    print_notices(page.list.notices.drain());
    if !deleted {
        bail!("Could not delete {}", label);
    }
    Ok(())
}

async fn dashboard(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let mut page = DashboardPage::new(ctx.services.reports.clone());
    page.load().await;
    print_notices(page.notices.drain());

    if let Some(summary) = &page.summary {
        println!("{}", format_summary(summary, format));
    }
    println!("Overdue");
    println!("{}", format_rows(&page.overdue, format));
    println!("Most borrowed");
    println!("{}", format_rows(&page.popular, format));
    Ok(())
}

async fn book_detail(ctx: &AppContext, id: Id, format: OutputFormat) -> Result<()> {
    let mut page = BookDetailPage::new(&ctx.services, &ctx.config.ui);
    page.load(id).await;
    print_notices(page.notices.drain());
    print_notices(page.items.list.notices.drain());

    let Some(master) = &page.master else {
        bail!("Book {} could not be loaded", id);
    };
    println!("{}", format_rows(std::slice::from_ref(master), format));
    println!(
        "{}",
        format_page(page.items.list.rows(), page.items.list.meta(), format)
    );
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

async fn import_books(ctx: &AppContext, file: &Path, category: Option<Id>, dry_run: bool) -> Result<()> {
    let mut import = BookImport::parse(&read_file(file)?);

    if let Some(id) = category {
        let category = ctx
            .services
            .categories
            .get(id)
            .await
            .map_err(|e| report(e, "Failed to load category"))?;
        import.apply_category_to_all(&category_option(category));
    }

    print_row_errors(import.errors());
    println!("{}", format_book_drafts(import.rows()));
    println!(
        "{} of {} row(s) ready to import",
        import.valid_count(),
        import.rows().len()
    );
    if dry_run {
        return Ok(());
    }

    let result = import.commit(&ctx.services.books).await;
    print_notices(import.notices.drain());
    let summary = result.context("Book import failed")?;
    println!("Imported {}, skipped {}", summary.imported, summary.skipped);
    Ok(())
}

async fn import_students(ctx: &AppContext, file: &Path, dry_run: bool) -> Result<()> {
    let mut import = StudentImport::parse(&read_file(file)?);

    print_row_errors(import.errors());
    println!("{}", format_student_drafts(import.rows()));
    if dry_run {
        return Ok(());
    }

    let result = import.commit(&ctx.services.students).await;
    print_notices(import.notices.drain());
    let summary = result.context("Student import failed")?;
    println!("Imported {}, skipped {}", summary.imported, summary.skipped);
    Ok(())
}

async fn borrow(
    ctx: &AppContext,
    student_id: Id,
    items: Vec<Id>,
    days: Option<u32>,
    date: Option<NaiveDate>,
    notes: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let services = &ctx.services;
    let ui = &ctx.config.ui;

    let mut form = BorrowForm::new(
        Arc::new(StudentOptions::new(services, ui)),
        Arc::new(AvailableItemOptions::new(services, ui)),
        ui,
        today(),
    );

    let student = services
        .students
        .get(student_id)
        .await
        .map_err(|e| report(e, "Failed to load student"))?;
    form.set_student(student);

    for id in items {
        let item = services
            .books
            .get_item(id)
            .await
            .map_err(|e| report(e, "Failed to load book item"))?;
        if !form.add_item(item) {
            eprintln!("[info] Book item {} listed more than once", id);
        }
    }
    if let Some(date) = date {
        form.set_borrow_date(date);
    }
    if let Some(days) = days {
        form.set_duration_days(days);
    }
    if let Some(notes) = notes {
        form.set_notes(&notes);
    }

    let result = form.submit(&services.transactions).await;
    print_notices(form.notices.drain());
    match result {
        Ok(transaction) => {
            println!("{}", format_rows(&[transaction], format));
            Ok(())
        }
        Err(e) => {
            if let Some(message) = form.error_message() {
                eprintln!("[error] {}", message);
            }
            Err(anyhow::Error::new(e).context("Borrow failed"))
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn return_items(
    ctx: &AppContext,
    borrow_id: Id,
    items: Vec<Id>,
    condition: Option<ItemCondition>,
    status: Option<ItemStatus>,
    date: Option<NaiveDate>,
    notes: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut form = ReturnForm::load(&ctx.services.transactions, borrow_id, date.unwrap_or_else(today))
        .await
        .map_err(|e| report(e, "Failed to load borrow transaction"))?;

    if form.lines().is_empty() {
        println!("Nothing left to return on borrow #{}", borrow_id);
        return Ok(());
    }

    if !items.is_empty() {
        form.select_all(false);
        for id in &items {
            match form.lines().iter().position(|l| l.book_item_id == *id) {
                Some(index) => form.toggle(index),
                None => bail!("Book item {} is not outstanding on borrow #{}", id, borrow_id),
            }
        }
    }
    for index in 0..form.lines().len() {
        if let Some(condition) = condition {
            form.set_condition(index, condition);
        }
        if status.is_some() {
            form.set_status(index, status);
        }
    }
    if let Some(notes) = notes {
        form.set_notes(&notes);
    }

    let result = form.submit(&ctx.services.transactions).await;
    print_notices(form.notices.drain());
    match result {
        Ok(transaction) => {
            println!("{}", format_rows(&[transaction], format));
            Ok(())
        }
        Err(e) => {
            if let Some(message) = form.error_message() {
                eprintln!("[error] {}", message);
            }
            Err(anyhow::Error::new(e).context("Return failed"))
        }
    }
}
