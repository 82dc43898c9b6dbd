//! Import rewriting over the compiled module's AST (oxc).
//!
//! Compiled modules are relocated into the cache directory, so every
//! relative specifier is pinned to an absolute path while the source
//! location is still known. One rule per node kind:
//!
//! | Node                         | Rule                                      |
//! |------------------------------|-------------------------------------------|
//! | `ImportDeclaration`          | resolve `source`                          |
//! | `ExportNamedDeclaration`     | resolve `source` when re-exporting        |
//! | `ExportAllDeclaration`       | resolve `source`                          |
//! | `ImportExpression`           | resolve string-literal argument           |
//! | `ExportDefaultDeclaration`   | bare identifier + top-level `components`  |
//! |                              | → `() => React.createElement(X, {components})` |

use std::path::Path;

use oxc::allocator::Allocator;
use oxc::ast::ast::{
    ArrowFunctionExpression, BindingIdentifier, BlockStatement, CatchClause, Class,
    ExportAllDeclaration, ExportDefaultDeclaration, ExportDefaultDeclarationKind,
    ExportNamedDeclaration, Expression, ForInStatement, ForOfStatement, ForStatement, Function,
    ImportDeclaration, ImportExpression, Program, Statement, StringLiteral, SwitchStatement,
    VariableDeclaration,
};
use oxc::ast_visit::{Visit, VisitMut, walk, walk_mut};
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::parser::Parser;
use oxc::span::{Atom, SourceType};
use oxc::syntax::scope::ScopeFlags;

use super::error::{CompileError, ModuleError, ResolveError};
use super::resolve::Resolver;

/// Name of the binding that enables the default-export instantiation rule.
const COMPONENTS_BINDING: &str = "components";

/// Parse `code`, rewrite its imports relative to `basedir`, and print it.
pub fn rewrite_module(code: &str, resolver: &Resolver, basedir: &Path) -> Result<String, ModuleError> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs().with_jsx(true);

    let ret = Parser::new(&allocator, code, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        return Err(CompileError::Syntax(message).into());
    }

    let mut program = ret.program;
    let default_exports = program
        .body
        .iter()
        .filter(|stmt| matches!(stmt, Statement::ExportDefaultDeclaration(_)))
        .count();
    if default_exports > 1 {
        return Err(CompileError::Syntax("duplicate `export default` in module".to_string()).into());
    }

    let has_components = TopLevelBindings::collect(&program).contains(COMPONENTS_BINDING);

    let mut rewriter = ImportRewriter {
        allocator: &allocator,
        resolver,
        basedir,
        has_components,
        error: None,
    };
    rewriter.visit_program(&mut program);
    if let Some(err) = rewriter.error {
        return Err(err.into());
    }

    let code = Codegen::new()
        .with_options(CodegenOptions {
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .build(&program)
        .code;
    Ok(code)
}

// =============================================================================
// Rewriter
// =============================================================================

struct ImportRewriter<'a, 'r> {
    allocator: &'a Allocator,
    resolver: &'r Resolver,
    basedir: &'r Path,
    /// Whether `components` is bound at module scope
    has_components: bool,
    /// First resolution failure; later specifiers are skipped
    error: Option<ResolveError>,
}

impl<'a> ImportRewriter<'a, '_> {
    /// Replace a relative specifier with its absolute path.
    fn pin(&mut self, specifier: &mut StringLiteral<'a>) {
        if self.error.is_some() {
            return;
        }

        match self.resolver.resolve(specifier.value.as_str(), self.basedir) {
            Ok(Some(path)) => {
                let value: &'a str = self.allocator.alloc_str(&path.to_string_lossy());
                specifier.value = Atom::from(value);
                specifier.raw = None;
            }
            Ok(None) => {}
            Err(err) => self.error = Some(err),
        }
    }

    /// Build `() => React.createElement(<name>, {components})`.
    fn instantiate(&self, name: &str) -> Option<ExportDefaultDeclarationKind<'a>> {
        let template = format!(
            "export default () => React.createElement({name}, {{{COMPONENTS_BINDING}}});"
        );
        let source: &'a str = self.allocator.alloc_str(&template);

        let mut program = Parser::new(self.allocator, source, SourceType::mjs())
            .parse()
            .program;
        match program.body.pop()? {
            Statement::ExportDefaultDeclaration(decl) => Some(decl.unbox().declaration),
            _ => None,
        }
    }
}

impl<'a> VisitMut<'a> for ImportRewriter<'a, '_> {
    fn visit_import_declaration(&mut self, it: &mut ImportDeclaration<'a>) {
        self.pin(&mut it.source);
    }

    fn visit_export_named_declaration(&mut self, it: &mut ExportNamedDeclaration<'a>) {
        if let Some(source) = it.source.as_mut() {
            self.pin(source);
        }
        walk_mut::walk_export_named_declaration(self, it);
    }

    fn visit_export_all_declaration(&mut self, it: &mut ExportAllDeclaration<'a>) {
        self.pin(&mut it.source);
    }

    fn visit_import_expression(&mut self, it: &mut ImportExpression<'a>) {
        if let Expression::StringLiteral(source) = &mut it.source {
            self.pin(source);
        }
        walk_mut::walk_import_expression(self, it);
    }

    fn visit_export_default_declaration(&mut self, it: &mut ExportDefaultDeclaration<'a>) {
        // Anything but a bare identifier (or no `components` in scope) is left as-is
        if self.has_components
            && let ExportDefaultDeclarationKind::Identifier(ident) = &it.declaration
        {
            let name = ident.name.to_string();
            if let Some(declaration) = self.instantiate(&name) {
                it.declaration = declaration;
                return;
            }
        }
        walk_mut::walk_export_default_declaration(self, it);
    }
}

// =============================================================================
// Module-scope bindings
// =============================================================================

/// Names bound at module scope.
///
/// Function and class bodies are not entered. Inside nested blocks only
/// `var` declarations count, since `let`/`const`/`class`/`function` there
/// are block-scoped.
#[derive(Default)]
struct TopLevelBindings {
    names: Vec<String>,
    /// Nesting depth of blocks below module scope
    depth: usize,
}

impl TopLevelBindings {
    fn collect(program: &Program<'_>) -> Self {
        let mut bindings = Self::default();
        bindings.visit_program(program);
        bindings
    }

    fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn nested(&mut self, visit: impl FnOnce(&mut Self)) {
        self.depth += 1;
        visit(self);
        self.depth -= 1;
    }
}

impl<'a> Visit<'a> for TopLevelBindings {
    fn visit_binding_identifier(&mut self, it: &BindingIdentifier<'a>) {
        self.names.push(it.name.to_string());
    }

    fn visit_variable_declaration(&mut self, it: &VariableDeclaration<'a>) {
        if self.depth > 0 && it.kind.is_lexical() {
            return;
        }
        walk::walk_variable_declaration(self, it);
    }

    fn visit_function(&mut self, it: &Function<'a>, _flags: ScopeFlags) {
        if self.depth == 0
            && let Some(id) = &it.id
        {
            self.visit_binding_identifier(id);
        }
    }

    fn visit_arrow_function_expression(&mut self, _it: &ArrowFunctionExpression<'a>) {}

    fn visit_class(&mut self, it: &Class<'a>) {
        if self.depth == 0
            && let Some(id) = &it.id
        {
            self.visit_binding_identifier(id);
        }
    }

    fn visit_block_statement(&mut self, it: &BlockStatement<'a>) {
        self.nested(|v| walk::walk_block_statement(v, it));
    }

    fn visit_for_statement(&mut self, it: &ForStatement<'a>) {
        self.nested(|v| walk::walk_for_statement(v, it));
    }

    fn visit_for_in_statement(&mut self, it: &ForInStatement<'a>) {
        self.nested(|v| walk::walk_for_in_statement(v, it));
    }

    fn visit_for_of_statement(&mut self, it: &ForOfStatement<'a>) {
        self.nested(|v| walk::walk_for_of_statement(v, it));
    }

    fn visit_switch_statement(&mut self, it: &SwitchStatement<'a>) {
        self.nested(|v| walk::walk_switch_statement(v, it));
    }

    // The catch parameter is scoped to the handler
    fn visit_catch_clause(&mut self, it: &CatchClause<'a>) {
        self.visit_block_statement(&it.body);
    }
}
