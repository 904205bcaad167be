//! In-memory backend that records every build, compile, and binding so tests
//! can observe cache decisions without a database.

use crate::{
    error::InternalError,
    query::{
        Backend, BuiltPlan, ExecutableQuery, LikeMode, MethodIdentity, Parameter,
        ParameterAccessor, ParameterBinder, ParameterSlot, Parameters, PlanKind, PlanRequest,
        QueryIntent, QueryMethod, ReturnShape, SlotKind, Sort,
    },
    value::Value,
};
use parking_lot::Mutex;
use std::{
    collections::HashSet,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
    time::Duration,
};

///
/// TestIntent
///

#[derive(Clone, Debug, Default)]
pub(crate) struct TestIntent {
    pub max_results: Option<u32>,
    pub exists: bool,
    pub count: bool,
}

impl TestIntent {
    pub(crate) const fn top(max_results: u32) -> Self {
        Self {
            max_results: Some(max_results),
            exists: false,
            count: false,
        }
    }

    pub(crate) const fn exists() -> Self {
        Self {
            max_results: None,
            exists: true,
            count: false,
        }
    }

    pub(crate) const fn count() -> Self {
        Self {
            max_results: None,
            exists: false,
            count: true,
        }
    }
}

impl QueryIntent for TestIntent {
    fn max_results(&self) -> Option<u32> {
        self.max_results
    }

    fn is_exists_projection(&self) -> bool {
        self.exists
    }

    fn is_count_projection(&self) -> bool {
        self.count
    }
}

///
/// TestPlan
///

#[derive(Debug)]
pub(crate) struct TestPlan {
    pub id: usize,
    pub kind: PlanKind,
    pub returned_type: String,
    pub sort: Sort,
    pub null_checks: Vec<usize>,
}

///
/// TestQuery
///

#[derive(Clone, Debug)]
pub(crate) struct TestQuery {
    pub plan_id: usize,
    pub kind: PlanKind,
    pub returned_type: String,
    pub sort: Sort,
    pub null_checks: Vec<usize>,
    pub bindings: Vec<(usize, Value)>,
    pub max_results: Option<u32>,
    pub first_result: u64,
    pub paginated: bool,
}

impl ExecutableQuery for TestQuery {
    fn max_results(&self) -> Option<u32> {
        self.max_results
    }

    fn set_max_results(&mut self, max_results: u32) {
        self.max_results = Some(max_results);
    }

    fn first_result(&self) -> u64 {
        self.first_result
    }

    fn set_first_result(&mut self, first_result: u64) {
        self.first_result = first_result;
    }
}

///
/// TestBinder
///

pub(crate) struct TestBinder {
    slots: Vec<ParameterSlot>,
    arity_skew: usize,
}

impl ParameterBinder<TestQuery> for TestBinder {
    fn arity(&self) -> usize {
        self.slots.len() + self.arity_skew
    }

    fn bind(
        &self,
        mut query: TestQuery,
        accessor: &ParameterAccessor<'_>,
    ) -> Result<TestQuery, InternalError> {
        for slot in &self.slots {
            let value = accessor
                .value(slot.index)
                .ok_or_else(|| InternalError::binder(format!("no value for slot {}", slot.index)))?;
            query.bindings.push((slot.index, slot.prepare_value(value)));
        }

        Ok(query)
    }

    fn bind_and_prepare(
        &self,
        query: TestQuery,
        accessor: &ParameterAccessor<'_>,
    ) -> Result<TestQuery, InternalError> {
        let mut query = self.bind(query, accessor)?;
        if let Some(page) = accessor.page() {
            query.first_result = page.offset();
            query.max_results = Some(page.size);
            query.paginated = true;
        }

        Ok(query)
    }
}

///
/// BuildRecord
///

#[derive(Clone, Debug)]
pub(crate) struct BuildRecord {
    pub kind: PlanKind,
    pub symbolic: bool,
    pub sort: Sort,
    pub returned_type: String,
    pub slots: Vec<ParameterSlot>,
}

///
/// TestBackend
///

#[derive(Default)]
pub(crate) struct TestBackend {
    intent: TestIntent,
    fail_parse: bool,
    fail_build: bool,
    fail_compile: bool,
    arity_skew: usize,
    compile_delay: Option<Duration>,
    next_plan: AtomicUsize,
    builds: Mutex<Vec<BuildRecord>>,
    compiles: AtomicUsize,
    compiling: Mutex<HashSet<usize>>,
    overlaps: AtomicUsize,
}

impl TestBackend {
    pub(crate) fn new(intent: TestIntent) -> Self {
        Self {
            intent,
            ..Self::default()
        }
    }

    pub(crate) fn failing_parse(mut self) -> Self {
        self.fail_parse = true;
        self
    }

    pub(crate) fn failing_build(mut self) -> Self {
        self.fail_build = true;
        self
    }

    pub(crate) fn failing_compile(mut self) -> Self {
        self.fail_compile = true;
        self
    }

    pub(crate) fn with_arity_skew(mut self) -> Self {
        self.arity_skew = 1;
        self
    }

    pub(crate) fn with_compile_delay(mut self, delay: Duration) -> Self {
        self.compile_delay = Some(delay);
        self
    }

    pub(crate) fn builds(&self) -> Vec<BuildRecord> {
        self.builds.lock().clone()
    }

    pub(crate) fn build_count(&self) -> usize {
        self.builds.lock().len()
    }

    pub(crate) fn compile_count(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }

    pub(crate) fn overlapping_compiles(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }
}

impl Backend for TestBackend {
    type Intent = TestIntent;
    type Plan = TestPlan;
    type Query = TestQuery;
    type Binder = TestBinder;

    fn parse_intent(&self, method: &QueryMethod) -> Result<TestIntent, InternalError> {
        if self.fail_parse {
            return Err(InternalError::intent(format!(
                "no property found for '{}'",
                method.name()
            )));
        }

        Ok(self.intent.clone())
    }

    fn build_plan(
        &self,
        request: PlanRequest<'_, TestIntent>,
    ) -> Result<BuiltPlan<TestPlan>, InternalError> {
        if self.fail_build {
            return Err(InternalError::plan("unknown property 'nam'"));
        }

        let accessor = request.source.accessor();
        let mut slots = Vec::new();
        let mut null_checks = Vec::new();

        for parameter in request.source.parameters().bindable() {
            let is_null = accessor
                .and_then(|accessor| accessor.value(parameter.index))
                .is_some_and(Value::is_null);
            if is_null {
                null_checks.push(parameter.index);
                continue;
            }

            let kind = if parameter
                .name
                .as_deref()
                .is_some_and(|name| name.ends_with("_like"))
            {
                SlotKind::Like {
                    mode: LikeMode::Containing,
                    escape: request.escape,
                }
            } else {
                SlotKind::Value
            };
            slots.push(ParameterSlot {
                index: parameter.index,
                name: parameter.name.clone(),
                kind,
                nullable: accessor.is_none(),
            });
        }

        let returned_type = match request.kind {
            PlanKind::Data => request.shape.returned_type().to_string(),
            PlanKind::Count => "count".to_string(),
        };
        let id = self.next_plan.fetch_add(1, Ordering::SeqCst);

        self.builds.lock().push(BuildRecord {
            kind: request.kind,
            symbolic: accessor.is_none(),
            sort: request.sort.clone(),
            returned_type: returned_type.clone(),
            slots: slots.clone(),
        });

        Ok(BuiltPlan {
            plan: TestPlan {
                id,
                kind: request.kind,
                returned_type,
                sort: request.sort.clone(),
                null_checks,
            },
            slots,
        })
    }

    fn create_binder(&self, _parameters: &Parameters, slots: &[ParameterSlot]) -> TestBinder {
        TestBinder {
            slots: slots.to_vec(),
            arity_skew: self.arity_skew,
        }
    }

    fn compile(&self, plan: &TestPlan) -> Result<TestQuery, InternalError> {
        if self.fail_compile {
            return Err(InternalError::session("session is closed"));
        }

        if !self.compiling.lock().insert(plan.id) {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        if let Some(delay) = self.compile_delay {
            thread::sleep(delay);
        }
        self.compiling.lock().remove(&plan.id);
        self.compiles.fetch_add(1, Ordering::SeqCst);

        Ok(TestQuery {
            plan_id: plan.id,
            kind: plan.kind,
            returned_type: plan.returned_type.clone(),
            sort: plan.sort.clone(),
            null_checks: plan.null_checks.clone(),
            bindings: Vec::new(),
            max_results: None,
            first_result: 0,
            paginated: false,
        })
    }
}

/// Method `UserRepository.<name>` returning `app::User`.
pub(crate) fn method(name: &str, parameters: impl IntoIterator<Item = Parameter>) -> QueryMethod {
    QueryMethod::new(
        MethodIdentity::new("UserRepository", name),
        Parameters::new(parameters),
        ReturnShape::entity("app::User"),
    )
}
