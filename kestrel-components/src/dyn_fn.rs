pub type DynFuture<R> = std::pin::Pin<Box<dyn std::future::Future<Output = R> + Send + 'static>>;
pub type DynFn<P, R> = Box<dyn Fn(P) -> DynFuture<R> + Send + Sync + 'static>;
pub type DynFnOnce<P, R> = Box<dyn FnOnce(P) -> DynFuture<R> + Send + Sync + 'static>;

pub trait IntoDynFn<P, R> {
    fn into_dyn_fn(self) -> DynFn<P, R>;
}

impl<F, Fut, P, R> IntoDynFn<P, R> for F
where
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = R> + Send + 'static,
    P: Send + 'static,
    R: Send + 'static,
{
    fn into_dyn_fn(self) -> DynFn<P, R> {
        let fn_ref = std::sync::Arc::new(self);
        Box::new(move |p| {
            let fn_ref = fn_ref.clone();
            Box::pin(async move { fn_ref(p).await })
        })
    }
}

pub trait IntoDynFnOnce<P, R> {
    fn into_dyn_fn_once(self) -> DynFnOnce<P, R>;
}

impl<F, Fut, P, R> IntoDynFnOnce<P, R> for F
where
    F: FnOnce(P) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = R> + Send + 'static,
    P: Send + 'static,
    R: Send + 'static,
{
    fn into_dyn_fn_once(self) -> DynFnOnce<P, R> {
        Box::new(move |p| {
            let fut = self(p);
            Box::pin(fut)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closure_converts_to_dyn_fn() {
        let doubled: DynFn<i32, i32> = (|n: i32| async move { n * 2 }).into_dyn_fn();
        assert_eq!(doubled(21).await, 42);
        assert_eq!(doubled(0).await, 0);
    }

    #[tokio::test]
    async fn closure_converts_to_dyn_fn_once() {
        let greeting = String::from("hello");
        let consume: DynFnOnce<&'static str, String> =
            (move |name: &'static str| async move { format!("{} {}", greeting, name) })
                .into_dyn_fn_once();
        assert_eq!(consume("world").await, "hello world");
    }
}
