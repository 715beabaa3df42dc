#![warn(clippy::uninlined_format_args)]

//! Grammar for plain-text trip ledgers.
//!
//! ```text
//! MEMBERS := alice, bob, carol
//! dinner: alice paid 100.00 INR for alice, bob, carol on 2024-05-01 #food
//! taxi: bob paid 12.5 USD for all
//! ```

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_till, take_until, take_while_m_n, take_while1},
    character::complete::{char, digit1, multispace1, satisfy},
    combinator::{map_res, not, opt, recognize},
    multi::{many0, separated_list1},
    sequence::{delimited, preceded, terminated},
};
use rust_decimal::Decimal;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum SplitSpec<'a> {
    /// Every declared member, in declaration order.
    All,
    Members(Vec<&'a str>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseEntry<'a> {
    pub id: &'a str,
    pub payer: &'a str,
    pub amount: Decimal,
    pub currency: &'a str,
    pub split: SplitSpec<'a>,
    pub date: Option<&'a str>,
    pub category: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement<'a> {
    Members(Vec<&'a str>),
    Expense(ExpenseEntry<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseWithLine<'a> {
    pub line: usize,
    pub expense: ExpenseEntry<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger<'a> {
    pub members: Vec<&'a str>,
    pub expenses: Vec<ExpenseWithLine<'a>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
    #[error("Ledger is missing a `MEMBERS := ...` declaration")]
    MissingMembersDeclaration,
    #[error("`MEMBERS` is declared a second time at line {line}")]
    DuplicateMembersDeclaration { line: usize },
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(is_identifier_char)(input)
}

fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag_no_case(word), not(satisfy(is_identifier_char)))
}

fn sp(input: &str) -> IResult<&str, &str> {
    fn comment(input: &str) -> IResult<&str, &str> {
        delimited(tag("/*"), take_until("*/"), tag("*/")).parse(input)
    }

    fn line_comment(input: &str) -> IResult<&str, &str> {
        recognize((tag("//"), take_till(|c| c == '\n'))).parse(input)
    }

    recognize(many0(alt((multispace1, comment, line_comment)))).parse(input)
}

fn member_list(input: &str) -> IResult<&str, Vec<&str>> {
    separated_list1((sp, char(','), sp), identifier).parse(input)
}

// MEMBERS := alice, bob
fn members_declaration(input: &str) -> IResult<&str, Vec<&str>> {
    (keyword("MEMBERS"), sp, tag(":="), sp, member_list)
        .map(|(_, _, _, _, members)| members)
        .parse(input)
}

fn amount(input: &str) -> IResult<&str, Decimal> {
    map_res(recognize((digit1, opt((char('.'), digit1)))), Decimal::from_str).parse(input)
}

fn currency(input: &str) -> IResult<&str, &str> {
    terminated(
        take_while_m_n(3, 3, |c: char| c.is_ascii_alphabetic()),
        not(satisfy(is_identifier_char)),
    )
    .parse(input)
}

fn split_spec(input: &str) -> IResult<&str, SplitSpec<'_>> {
    alt((
        keyword("all").map(|_| SplitSpec::All),
        member_list.map(SplitSpec::Members),
    ))
    .parse(input)
}

fn date(input: &str) -> IResult<&str, &str> {
    preceded(
        (keyword("on"), sp),
        take_while1(|c: char| c.is_ascii_digit() || c == '-'),
    )
    .parse(input)
}

fn category(input: &str) -> IResult<&str, &str> {
    preceded(char('#'), identifier).parse(input)
}

// {id}: {payer} paid {amount} {CUR} for {members|all} [on {date}] [#{category}]
fn expense(input: &str) -> IResult<&str, ExpenseEntry<'_>> {
    (
        identifier,
        sp,
        char(':'),
        sp,
        identifier,
        sp,
        keyword("paid"),
        sp,
        amount,
        sp,
        currency,
        sp,
        keyword("for"),
        sp,
        split_spec,
        opt(preceded(sp, date)),
        opt(preceded(sp, category)),
    )
        .map(
            |(id, _, _, _, payer, _, _, _, amount, _, currency, _, _, _, split, date, category)| {
                ExpenseEntry {
                    id,
                    payer,
                    amount,
                    currency,
                    split,
                    date,
                    category,
                }
            },
        )
        .parse(input)
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((
        members_declaration.map(Statement::Members),
        expense.map(Statement::Expense),
    ))
    .parse(input)
}

fn statement_with_sp(input: &str) -> IResult<&str, Statement<'_>> {
    (sp, statement, sp).map(|(_, stmt, _)| stmt).parse(input)
}

fn syntax_error_detail(err: nom::Err<nom::error::Error<&str>>) -> String {
    match err {
        nom::Err::Incomplete(_) => "unexpected end of line".to_string(),
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let near: String = e.input.chars().take(24).collect();
            if near.is_empty() {
                "unexpected end of line".to_string()
            } else {
                format!("unexpected input near '{near}'")
            }
        }
    }
}

/// Parse a whole ledger, one statement per line.
pub fn parse_ledger(input: &str) -> Result<Ledger<'_>, ParseError> {
    let mut members: Option<Vec<&str>> = None;
    let mut expenses = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let (rest, _) = sp(line).map_err(|e| ParseError::SyntaxError {
            line: line_no,
            detail: syntax_error_detail(e),
        })?;
        if rest.trim().is_empty() {
            continue;
        }

        let (rest, stmt) = statement_with_sp(rest).map_err(|e| ParseError::SyntaxError {
            line: line_no,
            detail: syntax_error_detail(e),
        })?;
        if !rest.trim().is_empty() {
            return Err(ParseError::SyntaxError {
                line: line_no,
                detail: format!("unexpected trailing input '{}'", rest.trim()),
            });
        }

        match stmt {
            Statement::Members(declared) => {
                if members.is_some() {
                    return Err(ParseError::DuplicateMembersDeclaration { line: line_no });
                }
                members = Some(declared);
            }
            Statement::Expense(expense) => expenses.push(ExpenseWithLine {
                line: line_no,
                expense,
            }),
        }
    }

    let members = members.ok_or(ParseError::MissingMembersDeclaration)?;
    Ok(Ledger { members, expenses })
}
